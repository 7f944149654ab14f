/// Replace `${ENV_VAR}` placeholders in config file text.
///
/// Unresolvable or malformed placeholders are left as-is, so a literal
/// `${...}` in a config value survives loading.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // No closing brace or empty name: emit literally.
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}
