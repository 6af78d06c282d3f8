use crate::dom::{Dom, Mutation};
use crate::events::EventOutcome;

pub const FORM_CLASS: &str = "needs-validation";
pub const VALIDATED_CLASS: &str = "was-validated";

/// Forms present when the page became ready. Forms inserted later are not
/// picked up.
pub fn collect<D: Dom>(dom: &D) -> Vec<D::Node> {
    dom.elements_by_class(FORM_CLASS)
}

/// Blocks submission of an invalid form and always turns on validation
/// styling.
pub fn plan_submit<D: Dom>(dom: &D, form: &D::Node) -> (EventOutcome, Vec<Mutation<D::Node>>) {
    let blocked = !dom.check_validity(form);
    let outcome = EventOutcome {
        default_prevented: blocked,
        propagation_stopped: blocked,
    };
    let mutations = vec![Mutation::AddClass {
        node: form.clone(),
        class: VALIDATED_CLASS,
    }];
    (outcome, mutations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{el, MemoryDom};

    fn form_page() -> MemoryDom {
        MemoryDom::with_body([el("form").class(FORM_CLASS).child(
            el("textarea").attr("name", "description").attr("required", ""),
        )])
    }

    #[test]
    fn invalid_form_is_blocked_and_styled() {
        let mut dom = form_page();
        let form = collect(&dom)[0];
        let (outcome, mutations) = plan_submit(&dom, &form);
        assert!(outcome.default_prevented);
        assert!(outcome.propagation_stopped);
        dom.apply_all(mutations);
        assert!(dom.has_class(&form, VALIDATED_CLASS));
    }

    #[test]
    fn valid_form_submits_but_is_still_styled() {
        let mut dom = form_page();
        let form = collect(&dom)[0];
        let textarea = dom.children(form)[0];
        dom.set_value(textarea, "Garbage not collected for a week");
        let (outcome, mutations) = plan_submit(&dom, &form);
        assert_eq!(outcome, EventOutcome::default());
        assert_eq!(
            mutations,
            vec![Mutation::AddClass {
                node: form,
                class: VALIDATED_CLASS
            }]
        );
    }
}
