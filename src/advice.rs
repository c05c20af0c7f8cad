use serde::Serialize;

use crate::search::{Match, ScanResult};

/// What to tell the user about an unknown command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advice {
    /// Nothing within `max_distance`.
    NotFound { command: String },
    /// The exact binary exists in these packages.
    Install { command: String, packages: Vec<Match> },
    /// Close but not exact.
    DidYouMean {
        command: String,
        distance: usize,
        suggestions: Vec<Match>,
    },
}

impl Advice {
    pub fn from_result(command: &str, result: &ScanResult, max_distance: usize) -> Self {
        let command = command.to_string();
        let matches = || result.matches.values().cloned().collect::<Vec<_>>();
        match result.best_distance {
            Some(0) => Advice::Install {
                command,
                packages: matches(),
            },
            Some(distance) if distance <= max_distance => Advice::DidYouMean {
                command,
                distance,
                suggestions: matches(),
            },
            _ => Advice::NotFound { command },
        }
    }

    pub fn render(&self, install_command: &str) -> String {
        match self {
            Advice::NotFound { command } => format!("{command}: command not found\n"),
            Advice::Install { command, packages } => {
                let mut out =
                    format!("The program {command} is not installed. Install it by executing:\n");
                let lines: Vec<String> = packages
                    .iter()
                    .map(|m| format!(" {install_command} {}{}\n", m.package, from_repo(m)))
                    .collect();
                out.push_str(&lines.join("or\n"));
                out
            }
            Advice::DidYouMean {
                command,
                suggestions,
                ..
            } => {
                let mut out = format!("No command {command} found, did you mean:\n");
                for m in suggestions {
                    out.push_str(&format!(
                        " Command {} in package {}{}\n",
                        m.binary,
                        m.package,
                        from_repo(m)
                    ));
                }
                out
            }
        }
    }
}

fn from_repo(m: &Match) -> String {
    if m.repository.is_empty() {
        String::new()
    } else {
        format!(" from the {} repository", m.repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_INSTALL_COMMAND, MAX_SUGGEST_DISTANCE};
    use crate::index::IndexEntry;
    use crate::search::scan;
    use pretty_assertions::assert_eq;

    fn index(packages: &[(&str, &[&str])]) -> Vec<IndexEntry> {
        packages.iter()
            .flat_map(|(pkg, bins)| {
                std::iter::once(IndexEntry::Package(pkg.to_string()))
                    .chain(bins.iter().map(|b| IndexEntry::Binary(b.to_string())))
            })
            .collect()
    }

    fn advise(query: &str, entries: &[IndexEntry], repository: &str) -> Advice {
        let result = scan(query, entries, repository).unwrap();
        Advice::from_result(query, &result, MAX_SUGGEST_DISTANCE)
    }

    #[test]
    fn exact_match_lists_install_commands() {
        let entries = index(&[("vim", &["vim"]), ("vim-tiny", &["vim"])]);
        let advice = advise("vim", &entries, "");
        assert_eq!(
            advice.render(DEFAULT_INSTALL_COMMAND),
            "The program vim is not installed. Install it by executing:\n \
             apt install vim\nor\n apt install vim-tiny\n"
        );
    }

    #[test]
    fn near_match_suggests_binaries() {
        let entries = index(&[("git", &["git"]), ("sl", &["sl"])]);
        let advice = advise("gti", &entries, "");
        assert!(matches!(advice, Advice::DidYouMean { distance: 2, .. }));
        assert_eq!(
            advice.render(DEFAULT_INSTALL_COMMAND),
            "No command gti found, did you mean:\n Command git in package git\n"
        );
    }

    #[test]
    fn repository_tag_is_mentioned() {
        let entries = index(&[("xeyes", &["xeyes"])]);
        let advice = advise("xeye", &entries, "x11");
        assert_eq!(
            advice.render(DEFAULT_INSTALL_COMMAND),
            "No command xeye found, did you mean:\n \
             Command xeyes in package xeyes from the x11 repository\n"
        );
    }

    #[test]
    fn too_far_is_not_found() {
        let entries = index(&[("coreutils", &["ls"])]);
        let advice = advise("kubectl", &entries, "");
        assert_eq!(
            advice,
            Advice::NotFound {
                command: "kubectl".to_string()
            }
        );
        assert_eq!(advice.render("pkg install"), "kubectl: command not found\n");
    }

    #[test]
    fn threshold_is_inclusive() {
        let entries = index(&[("p", &["abcd"])]);
        assert!(matches!(
            advise("abcdefg", &entries, ""),
            Advice::DidYouMean { distance: 3, .. }
        ));
        assert!(matches!(
            advise("abcdefgh", &entries, ""),
            Advice::NotFound { .. }
        ));
    }

    #[test]
    fn empty_result_is_not_found() {
        let advice = Advice::from_result("ls", &ScanResult::default(), MAX_SUGGEST_DISTANCE);
        assert!(matches!(advice, Advice::NotFound { .. }));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let entries = index(&[("coreutils", &["ls"])]);
        let json = serde_json::to_value(advise("ls", &entries, "")).unwrap();
        assert_eq!(json["kind"], "install");
        assert_eq!(json["packages"][0]["package"], "coreutils");
    }
}
