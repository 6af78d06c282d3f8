use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentNode {
    Element(Fragment),
    Text(String),
}

/// Element markup described as data rather than as an HTML string.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<FragmentNode>,
}

pub fn el(tag: &str) -> Fragment {
    Fragment {
        tag: tag.to_ascii_lowercase(),
        classes: Vec::new(),
        attributes: Vec::new(),
        children: Vec::new(),
    }
}

impl Fragment {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Accepts a space separated list, like the `class` attribute.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            return self.class(value);
        }
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(FragmentNode::Text(text.to_string()));
        self
    }

    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(FragmentNode::Element(child));
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" "), true));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value, true));
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                FragmentNode::Element(element) => element.write_html(out),
                FragmentNode::Text(text) => out.push_str(&escape(text, false)),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta" | "source" | "wbr"
    )
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_markup() {
        let fragment = el("div")
            .id("card-1")
            .class("grievance-card unread")
            .child(el("h5").text("Water <supply>"))
            .child(el("input").attr("name", "q"));
        assert_eq!(
            fragment.to_html(),
            "<div class=\"grievance-card unread\" id=\"card-1\"><h5>Water &lt;supply&gt;</h5><input name=\"q\"></div>"
        );
    }

    #[test]
    fn class_attribute_merges_into_class_list() {
        let fragment = el("span").class("badge").attr("class", "badge border");
        assert_eq!(fragment.classes, vec!["badge", "border"]);
        assert!(fragment.attributes.is_empty());
    }
}
