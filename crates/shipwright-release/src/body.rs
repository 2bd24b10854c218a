//! Pull request body composition and parsing

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;

const DIVIDER: &str = "\n---\n";

static DETAILS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<details><summary>(?P<label>.+?): (?P<version>\S+?)</summary>\n\n(?P<notes>.*?)\n</details>")
        .expect("Invalid regex")
});

static HEADING_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##\s+\[?v?(?P<version>\d+\.\d+\.\d+[^\]\s)]*)").expect("Invalid regex")
});

/// Release notes of one component inside a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodySection {
    /// Summary label; only rendered when the body holds several sections
    pub component: Option<String>,
    pub version: Version,
    pub notes: String,
}

impl BodySection {
    pub fn new(component: Option<String>, version: Version, notes: impl Into<String>) -> Self {
        Self {
            component,
            version,
            notes: notes.into().trim_end().to_string(),
        }
    }

    fn render_wrapped(&self) -> String {
        format!(
            "<details><summary>{}: {}</summary>\n\n{}\n</details>",
            self.component.as_deref().unwrap_or("."),
            self.version,
            self.notes
        )
    }
}

/// Structured release pull request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestBody {
    pub header: String,
    pub sections: Vec<BodySection>,
    pub footer: String,
}

impl PullRequestBody {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sections: Vec::new(),
            footer: footer.into(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<BodySection>) -> Self {
        self.sections = sections;
        self
    }

    /// Replace the section labelled `component`, or append it
    pub fn replace_section(&mut self, section: BodySection) {
        match self.sections.iter_mut().find(|s| s.component == section.component) {
            Some(slot) => *slot = section,
            None => self.sections.push(section),
        }
    }

    pub fn render(&self) -> String {
        let content = match self.sections.as_slice() {
            [single] => single.notes.clone(),
            sections => sections
                .iter()
                .map(BodySection::render_wrapped)
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        format!(
            "{}{}\n\n{}\n\n{}{}",
            self.header, DIVIDER, content, DIVIDER, self.footer
        )
    }

    /// Parse a rendered body back into its parts
    ///
    /// A single unwrapped section has no label; its version is read from the
    /// first release heading of the notes.
    pub fn parse(body: &str) -> Option<Self> {
        let (header, rest) = body.split_once(DIVIDER)?;
        let (content, footer) = rest.rsplit_once(DIVIDER)?;
        let content = content.trim_matches('\n');

        let mut sections = Vec::new();
        for caps in DETAILS_REGEX.captures_iter(content) {
            let label = caps.name("label")?.as_str();
            sections.push(BodySection {
                component: (label != ".").then(|| label.to_string()),
                version: Version::parse(caps.name("version")?.as_str()).ok()?,
                notes: caps.name("notes")?.as_str().to_string(),
            });
        }

        if sections.is_empty() && !content.is_empty() {
            let version = HEADING_VERSION_REGEX
                .captures(content)
                .and_then(|caps| Version::parse(caps.name("version")?.as_str()).ok())?;
            sections.push(BodySection {
                component: None,
                version,
                notes: content.to_string(),
            });
        }

        Some(Self {
            header: header.to_string(),
            sections,
            footer: footer.to_string(),
        })
    }
}

impl fmt::Display for PullRequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(component: &str, version: &str) -> BodySection {
        BodySection::new(
            Some(component.to_string()),
            Version::parse(version).unwrap(),
            format!("## {} (2024-05-01)\n\n\n### Bug Fixes\n\n* a fix (abc1234)\n", version),
        )
    }

    #[test]
    fn test_single_section_unwrapped() {
        let body = PullRequestBody::new("header", "footer").with_sections(vec![section("core", "1.0.1")]);
        let rendered = body.render();

        assert!(rendered.starts_with("header\n---\n"));
        assert!(rendered.ends_with("\n---\nfooter"));
        assert!(!rendered.contains("<details>"));
        assert!(rendered.contains("* a fix (abc1234)"));

        let parsed = PullRequestBody::parse(&rendered).unwrap();
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].component, None);
        assert_eq!(parsed.sections[0].version, Version::new(1, 0, 1));
        assert_eq!(parsed.sections[0].notes, body.sections[0].notes);
    }

    #[test]
    fn test_multiple_sections_wrapped() {
        let body = PullRequestBody::new("header", "footer")
            .with_sections(vec![section("pkg1", "1.0.1"), section("pkg2", "0.2.4")]);
        let rendered = body.render();

        assert!(rendered.contains("<details><summary>pkg1: 1.0.1</summary>"));
        assert!(rendered.contains("<details><summary>pkg2: 0.2.4</summary>"));
        assert_eq!(PullRequestBody::parse(&rendered), Some(body));
    }

    #[test]
    fn test_replace_section() {
        let mut body = PullRequestBody::new("h", "f")
            .with_sections(vec![section("pkg1", "1.0.1"), section("pkg2", "0.2.4")]);
        body.replace_section(section("pkg2", "0.3.0"));

        assert_eq!(body.sections.len(), 2);
        assert_eq!(body.sections[1].version, Version::new(0, 3, 0));
    }

    #[test]
    fn test_parse_rejects_unstructured_body() {
        assert_eq!(PullRequestBody::parse("just some text"), None);
    }
}
