//! `$`-placeholder substitution for templates and SQL
//!
//! Supported forms are `$name`, `${name}` and `$$` (a literal `$`). Names
//! start with an ASCII letter or underscore followed by letters, digits or
//! underscores. Substitution is lenient: a name missing from the env, or a
//! `$` that does not start a valid placeholder, is copied through unchanged
//! so templates for other tools (shell snippets, Caddy `{$VAR}`) survive.

use crate::env::Env;

pub fn safe_substitute(template: &str, env: &Env) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        if let Some(inner) = after.strip_prefix('{') {
            let name_len = identifier_len(inner);
            if name_len > 0 && inner[name_len..].starts_with('}') {
                let name = &inner[..name_len];
                let consumed = 1 + name_len + 1;
                match env.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[pos..pos + 1 + consumed]),
                }
                rest = &after[consumed..];
                continue;
            }
        } else {
            let name_len = identifier_len(after);
            if name_len > 0 {
                let name = &after[..name_len];
                match env.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('$');
                        out.push_str(name);
                    }
                }
                rest = &after[name_len..];
                continue;
            }
        }

        // Not a placeholder
        out.push('$');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Byte length of the identifier at the start of `s`, 0 if there is none
fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }

    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Env {
        [("DOMAIN", "example.org"), ("PORT", "8080"), ("_X1", "x")]
            .into_iter()
            .collect()
    }

    #[test]
    fn substitutes_braced_and_bare_names() {
        assert_eq!(
            safe_substitute("server_name: ${DOMAIN}:$PORT", &env()),
            "server_name: example.org:8080"
        );
    }

    #[test]
    fn bare_name_stops_at_first_non_identifier_char() {
        assert_eq!(safe_substitute("$DOMAIN.local", &env()), "example.org.local");
        assert_eq!(safe_substitute("$_X1-y", &env()), "x-y");
    }

    #[test]
    fn unknown_names_are_left_verbatim() {
        assert_eq!(
            safe_substitute("${MISSING} and $MISSING", &env()),
            "${MISSING} and $MISSING"
        );
    }

    #[test]
    fn double_dollar_is_an_escape() {
        assert_eq!(safe_substitute("cost: $$5 $$PORT", &env()), "cost: $5 $PORT");
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        assert_eq!(safe_substitute("a $ b", &env()), "a $ b");
        assert_eq!(safe_substitute("${1abc}", &env()), "${1abc}");
        assert_eq!(safe_substitute("${DOMAIN", &env()), "${DOMAIN");
        assert_eq!(safe_substitute("trailing $", &env()), "trailing $");
    }

    #[test]
    fn caddy_env_placeholders_survive() {
        assert_eq!(
            safe_substitute("host grafana.{$DESEC_DOMAIN}", &env()),
            "host grafana.{$DESEC_DOMAIN}"
        );
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let text = "listen 443 ssl;\n# ünïcode stays\n";
        assert_eq!(safe_substitute(text, &env()), text);
    }
}
