use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

// Keys the dropdown reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    Enter,
    Space,
    Escape,
    Other,
}

impl DropdownKey {
    pub fn from_key(key: &str) -> Self {
        match key {
            "Enter" => DropdownKey::Enter,
            " " | "Space" => DropdownKey::Space,
            "Escape" => DropdownKey::Escape,
            _ => DropdownKey::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropdownFocus {
    Toggle,
    Menu,
    Elsewhere,
}

/// Custom select bound to a hidden form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub field_name: String,
    pub placeholder: String,
    pub options: Vec<DropdownOption>,
    pub expanded: bool,
    pub selected: Option<usize>,
    pub option_selected: bool,
    pub focus: DropdownFocus,
}

impl Dropdown {
    pub fn new(field_name: &str, placeholder: &str, options: Vec<DropdownOption>) -> Self {
        Self {
            field_name: field_name.to_string(),
            placeholder: placeholder.to_string(),
            options,
            expanded: false,
            selected: None,
            option_selected: false,
            focus: DropdownFocus::Elsewhere,
        }
    }

    pub fn click_toggle(&mut self) {
        self.expanded = !self.expanded;
        if self.expanded {
            self.focus = DropdownFocus::Menu;
        }
        debug!("Dropdown '{}' expanded={}", self.field_name, self.expanded);
    }

    /// Picks an option, closes the menu and returns the hidden field's new value.
    pub fn choose(&mut self, index: usize) -> Option<String> {
        let value = self.options.get(index)?.value.clone();
        self.selected = Some(index);
        self.expanded = false;
        self.option_selected = true;
        debug!("Dropdown '{}' selected '{}'", self.field_name, value);
        Some(value)
    }

    /// Key pressed on the toggle: Enter and Space act as a click.
    pub fn toggle_key(&mut self, key: DropdownKey) -> bool {
        match key {
            DropdownKey::Enter | DropdownKey::Space => {
                self.click_toggle();
                true
            }
            _ => false,
        }
    }

    /// Key pressed inside the menu: Escape closes and hands focus back to the toggle.
    pub fn menu_key(&mut self, key: DropdownKey) -> bool {
        if key != DropdownKey::Escape {
            return false;
        }
        self.expanded = false;
        self.focus = DropdownFocus::Toggle;
        true
    }

    pub fn clear_confirmation(&mut self) {
        self.option_selected = false;
    }

    pub fn reset(&mut self) {
        self.expanded = false;
        self.selected = None;
        self.option_selected = false;
    }

    pub fn toggle_label(&self) -> &str {
        self.selected
            .and_then(|index| self.options.get(index))
            .map(|option| option.label.as_str())
            .unwrap_or(&self.placeholder)
    }
}

/// Session-type selector of the booking page, bound to the hidden `sessionType` field.
pub fn session_type_dropdown() -> Dropdown {
    Dropdown::new(
        "sessionType",
        "Select a session type",
        vec![
            DropdownOption::new("Portrait Session", "portrait"),
            DropdownOption::new("Family Session", "family"),
            DropdownOption::new("Event Coverage", "event"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_types() -> Dropdown {
        Dropdown::new(
            "sessionType",
            "Select a session",
            vec![
                DropdownOption::new("Portrait Session", "portrait"),
                DropdownOption::new("Family Session", "family"),
            ],
        )
    }

    #[test]
    fn test_choose_sets_value_and_closes() {
        let mut dropdown = session_types();
        dropdown.click_toggle();
        assert!(dropdown.expanded);

        assert_eq!(dropdown.choose(1), Some("family".to_string()));
        assert!(!dropdown.expanded);
        assert!(dropdown.option_selected);
        assert_eq!(dropdown.toggle_label(), "Family Session");
    }

    #[test]
    fn test_choose_out_of_range_is_ignored() {
        let mut dropdown = session_types();
        dropdown.click_toggle();
        assert_eq!(dropdown.choose(5), None);
        assert!(dropdown.expanded);
        assert_eq!(dropdown.toggle_label(), "Select a session");
    }

    #[test]
    fn test_keyboard_open_and_escape() {
        let mut dropdown = session_types();
        assert!(dropdown.toggle_key(DropdownKey::from_key("Enter")));
        assert!(dropdown.expanded);
        assert!(dropdown.toggle_key(DropdownKey::from_key(" ")));
        assert!(!dropdown.expanded);

        assert!(!dropdown.toggle_key(DropdownKey::from_key("a")));

        dropdown.click_toggle();
        assert!(dropdown.menu_key(DropdownKey::Escape));
        assert!(!dropdown.expanded);
        assert_eq!(dropdown.focus, DropdownFocus::Toggle);
    }
}
