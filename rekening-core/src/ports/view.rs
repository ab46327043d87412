//! Page view port
//!
//! The page is reached only through this trait. Components read and write
//! the elements they own by role; the host maps roles to whatever its UI
//! uses (DOM elements, terminal widgets, test doubles).

/// Input and display roles the components work with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// The n-th amount input on the page
    Amount(usize),
    /// Recipient account number input of the transfer form
    RecipientAccount,
    /// Element showing the current balance
    BalanceDisplay,
}

/// Host view abstraction
///
/// Methods take `&self`: the poller writes the balance display from its own
/// task while input handlers run, so implementations provide their own
/// interior mutability.
pub trait PageView: Send + Sync {
    /// Number of amount inputs on the page
    fn amount_field_count(&self) -> usize;

    /// Current text of an element, `None` when the page has no such element
    fn text(&self, role: FieldRole) -> Option<String>;

    /// Replace the text of an element. Returns `false` if the element is absent.
    fn set_text(&self, role: FieldRole, text: &str) -> bool;

    /// Whether the page contains the transfer submission form
    fn has_transfer_form(&self) -> bool;

    /// Show a blocking message to the user
    fn alert(&self, message: &str);
}
