//! Built-in element selectors.

use super::ElementSelector;
use crate::node::XmlElement;

/// Accepts elements with the same namespace-resolved name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl ElementSelector for ByName {
    fn can_be_compared(&self, control: &XmlElement, test: &XmlElement) -> bool {
        control.name() == test.name()
    }
}

/// Accepts elements with the same name and the same normalized text.
///
/// Two elements without text count as having the same text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByNameAndText;

impl ElementSelector for ByNameAndText {
    fn can_be_compared(&self, control: &XmlElement, test: &XmlElement) -> bool {
        control.name() == test.name() && control.text_content() == test.text_content()
    }
}
