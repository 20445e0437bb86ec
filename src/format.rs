//! Output grouping for converted messages.

/// Width of a printed group.
pub const GROUP_SIZE: usize = 5;

/// Splits `msg` into groups of `size` symbols separated by single spaces.
/// The last group may be shorter. A `size` of 0 returns `msg` unchanged.
///
/// # Examples
///
/// ```
/// use enigma::format::group;
///
/// assert_eq!(group("QVPQSOKOILPUBKJZPISFXDW", 5), "QVPQS OKOIL PUBKJ ZPISF XDW");
/// assert_eq!(group("", 5), "");
/// ```
pub fn group(msg: &str, size: usize) -> String {
    if size == 0 {
        return msg.to_string();
    }
    let mut out = String::with_capacity(msg.len() + msg.len() / size);
    for (i, ch) in msg.chars().enumerate() {
        if i > 0 && i % size == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
