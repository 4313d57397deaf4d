use std::path::Path;
use std::path::PathBuf;

pub trait PathExt {
    /// Expands a leading `~` and any `$VAR` / `${VAR}` references
    fn replace_env(&self) -> PathBuf;
}

impl<P: AsRef<Path>> PathExt for P {
    fn replace_env(&self) -> PathBuf {
        let raw = self.as_ref().to_string_lossy();

        let expanded = match raw.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                match dirs::home_dir() {
                    Some(home) => format!("{}{rest}", home.display()),
                    None => raw.to_string(),
                }
            }
            _ => raw.to_string(),
        };

        PathBuf::from(expand_variables(&expanded))
    }
}

/// For use as a clap `value_parser`
pub fn replace_env_in_path(input: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(input.replace_env())
}

fn expand_variables(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            output.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut name = String::new();
        while let Some(next) = chars.next_if(|n| n.is_ascii_alphanumeric() || *n == '_') {
            name.push(next);
        }

        let closed = braced && chars.next_if_eq(&'}').is_some();

        // unset variables and malformed references are left untouched
        match std::env::var(&name) {
            Ok(value) if !name.is_empty() && (!braced || closed) => output.push_str(&value),
            _ => {
                output.push('$');
                if braced {
                    output.push('{');
                }
                output.push_str(&name);
                if closed {
                    output.push('}');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!("~/Pictures/a.png".replace_env(), home.join("Pictures/a.png"));
        assert_eq!("~".replace_env(), home);
        // only a leading tilde followed by a separator refers to the home directory
        assert_eq!("~other/a.png".replace_env(), PathBuf::from("~other/a.png"));
    }

    #[test]
    fn test_expands_variables() {
        let home = std::env::var("HOME").unwrap();
        assert_eq!(
            "$HOME/a.png".replace_env(),
            PathBuf::from(format!("{home}/a.png"))
        );
        assert_eq!(
            "${HOME}/a.png".replace_env(),
            PathBuf::from(format!("{home}/a.png"))
        );
    }

    #[test]
    fn test_leaves_unknown_variables() {
        let input = "/tmp/$SKYLIGHT_SURELY_UNSET_VARIABLE/${ALSO_UNSET_SKYLIGHT}/$";
        assert_eq!(input.replace_env(), PathBuf::from(input));
        assert_eq!(
            replace_env_in_path("/plain/path.jpg").unwrap(),
            PathBuf::from("/plain/path.jpg")
        );
    }
}
