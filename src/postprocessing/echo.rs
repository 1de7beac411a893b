//! Removes the prompt the model echoes back in front of its answer.

/// Strips `prompt` from the front of `decoded`.
///
/// Detokenizers may add leading whitespace or a BOS marker, so when the
/// text does not start with the prompt the first occurrence is cut instead.
/// Text without the prompt is returned as-is. The answer is trimmed.
pub fn strip_echo(decoded: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return decoded.trim().to_string();
    }

    let answer = decoded
        .trim_start()
        .strip_prefix(prompt)
        .or_else(|| {
            decoded
                .find(prompt)
                .map(|at| &decoded[at + prompt.len()..])
        })
        .or_else(|| decoded.trim_start().strip_prefix(prompt.trim()))
        .unwrap_or(decoded);

    answer.trim().to_string()
}
