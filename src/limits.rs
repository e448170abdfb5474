//! Input-size bounds enforced at the mutation boundary.

/// Short identity fields: user name, username, password, group, cabinet kind.
pub const MAX_NAME_LEN: usize = 50;

/// Free-text fields: cabinet description, assignment purpose.
pub const MAX_TEXT_LEN: usize = 1024;
