/// Checks whether `value` contains something shaped like an email address:
/// a run of non-whitespace characters with an `@` followed by a `.`, and at
/// least one character before the `@`, between `@` and `.`, and after the
/// `.`. This is the same unanchored check the login identifier fallback has
/// always used, not a full address validator.
pub fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        token.char_indices().any(|(at, c)| {
            if c != '@' || at == 0 {
                return false;
            }
            let rest = &token[at + 1..];
            rest.char_indices()
                .any(|(dot, c)| c == '.' && dot > 0 && dot + 1 < rest.len())
        })
    })
}
