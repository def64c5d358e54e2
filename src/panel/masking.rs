use crate::consts::cli_consts::ui::MASK_CHAR;

/// Hides a secret behind one placeholder per character.
///
/// The mask keeps the secret's length visible.
pub fn mask(secret: &str) -> String {
    std::iter::repeat_n(MASK_CHAR, secret.chars().count()).collect()
}
