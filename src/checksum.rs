/// Position of the checksum in the space-separated runner output.
///
/// The runner prints `PASS "<path>" with checksum <value>`, so the value is
/// the fifth token.
pub const CHECKSUM_TOKEN_INDEX: usize = 4;

/// Returned when the runner output is too short to hold a checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutOfRange {
    /// Number of tokens the output split into.
    pub tokens: usize,
}

/// Extract the checksum token from `processOutput`.
///
/// Splits on single spaces (runs of spaces produce empty tokens) and returns
/// the token at [`CHECKSUM_TOKEN_INDEX`] with any trailing line terminator
/// removed. The token is not validated.
pub fn extract_checksum(process_output: &str) -> Result<&str, TokenOutOfRange> {
    let mut tokens = process_output.split(' ');

    match tokens.nth(CHECKSUM_TOKEN_INDEX) {
        Some(token) => Ok(token.trim_end_matches(['\r', '\n'])),
        None => Err(TokenOutOfRange {
            tokens: process_output.split(' ').count(),
        }),
    }
}
