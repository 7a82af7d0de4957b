//! Login and registration form state
//!
//! Two text forms sharing one widget: login (login + password) and
//! register (name + email + password). Auth failures land here as an
//! inline error string; the session itself is owned by the caller.

/// Which auth screen the form is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// One labelled input field
#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    /// Render as dots (passwords)
    pub masked: bool,
}

impl Field {
    fn new(label: &'static str, masked: bool) -> Self {
        Self {
            label,
            value: String::new(),
            masked,
        }
    }

    /// Value as shown on screen
    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Form state for the login/register screens
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub fields: Vec<Field>,
    /// Focused field index
    pub focus: usize,
    /// Inline error shown under the form
    pub error: Option<String>,
    /// A request is in flight; input is ignored until it lands
    pub submitting: bool,
}

impl AuthForm {
    pub fn login() -> Self {
        Self {
            mode: AuthMode::Login,
            fields: vec![Field::new("Login", false), Field::new("Password", true)],
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn register() -> Self {
        Self {
            mode: AuthMode::Register,
            fields: vec![
                Field::new("Name", false),
                Field::new("Email", false),
                Field::new("Password", true),
            ],
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn insert(&mut self, c: char) {
        if !self.submitting {
            self.fields[self.focus].value.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            self.fields[self.focus].value.pop();
        }
    }

    /// Move focus to the next field, wrapping
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Whether every field has content
    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|f| !f.value.trim().is_empty())
    }

    /// Field values in declaration order
    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.value.as_str()).collect()
    }

    /// Request failed: show the error inline and accept input again
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_fields() {
        let form = AuthForm::login();
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0].label, "Login");
        assert!(form.fields[1].masked);
    }

    #[test]
    fn test_register_form_fields() {
        let form = AuthForm::register();
        assert_eq!(form.fields.len(), 3);
        assert_eq!(form.fields[1].label, "Email");
    }

    #[test]
    fn test_typing_and_focus() {
        let mut form = AuthForm::login();
        form.insert('a');
        form.insert('d');
        form.insert('a');
        form.focus_next();
        form.insert('p');
        form.insert('w');

        assert_eq!(form.values(), vec!["ada", "pw"]);
        assert!(form.is_complete());
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = AuthForm::login();
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert_eq!(form.focus, 1);
    }

    #[test]
    fn test_masked_display() {
        let mut form = AuthForm::login();
        form.focus_next();
        form.insert('s');
        form.insert('e');
        form.insert('c');
        assert_eq!(form.fields[1].display_value(), "•••");
        assert_eq!(form.fields[0].display_value(), "");
    }

    #[test]
    fn test_incomplete_form() {
        let mut form = AuthForm::login();
        form.insert('a');
        assert!(!form.is_complete());
    }

    #[test]
    fn test_fail_keeps_values_and_shows_error() {
        let mut form = AuthForm::login();
        form.insert('a');
        form.submitting = true;

        form.fail("Invalid credentials");
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert!(!form.submitting);
        assert_eq!(form.fields[0].value, "a");
    }

    #[test]
    fn test_typing_clears_error() {
        let mut form = AuthForm::login();
        form.fail("Invalid credentials");
        form.insert('x');
        assert!(form.error.is_none());
    }

    #[test]
    fn test_submitting_blocks_input() {
        let mut form = AuthForm::login();
        form.submitting = true;
        form.insert('x');
        form.backspace();
        assert_eq!(form.fields[0].value, "");
    }
}
