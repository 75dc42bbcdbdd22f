use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// The directories holding this crate's own Rust sources. Nothing else is scanned.
const SOURCE_DIRS: [&str; 4] = ["score", "cli", "tests", "benches"];

// The policy rules enforced on every scanned file.
#[derive(Clone, Copy)]
enum Rule {
    UnderscorePrefix,
    ForbiddenWord,
    StarsInComment,
    AllCapsComment,
    AllowDeadCode,
}

impl Rule {
    fn pattern(self) -> &'static str {
        match self {
            Rule::UnderscorePrefix => r"\b(_[a-zA-Z0-9_]+)\b",
            Rule::ForbiddenWord => {
                r"(//|/\*).*(?:FIXED|CORRECTED|FIX|FIXES|NEW|CHANGED|CHANGES|CHANGE|MODIFIED|MODIFIES|MODIFY|UPDATED|UPDATES|UPDATE)"
            }
            Rule::StarsInComment => r"(//|/\*).*\*\*",
            Rule::AllCapsComment => r"(//|/\*).*",
            Rule::AllowDeadCode => r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]",
        }
    }

    fn explanation(self) -> &'static str {
        match self {
            Rule::UnderscorePrefix => {
                "Underscore-prefixed variable names are not allowed in this project.\n   Either use the variable (removing the underscore) or remove it completely."
            }
            Rule::ForbiddenWord => {
                "Comments narrating edits (FIXED, CHANGED, UPDATED and similar) are STRICTLY FORBIDDEN in this project.\n   Remove them completely rather than commenting them out."
            }
            Rule::StarsInComment => {
                "The '**' pattern is not allowed in regular comments (but is allowed in doc comments)."
            }
            Rule::AllCapsComment => {
                "Comments where all alphabetic characters are uppercase are STRICTLY FORBIDDEN in this project."
            }
            Rule::AllowDeadCode => {
                "#[allow(dead_code)] attributes are STRICTLY FORBIDDEN in this project.\n   Either use the code (removing the attribute) or remove it completely."
            }
        }
    }

    // Decides whether a line the regex matched is a genuine violation.
    fn is_violation(self, line_text: &str) -> bool {
        let trimmed = line_text.trim_start();
        match self {
            Rule::UnderscorePrefix => !is_comment(trimmed) && !underscore_only_in_strings(line_text),
            Rule::ForbiddenWord | Rule::AllowDeadCode => true,
            Rule::StarsInComment => !is_doc_comment(trimmed),
            Rule::AllCapsComment => comment_text(trimmed).is_some_and(|text| {
                let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
                !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
            }),
        }
    }
}

// A "Sink" for the grep searcher. It collects all violating lines of one file so the
// error message can list every one of them.
struct ViolationCollector {
    rule: Rule,
    violations: Vec<String>,
}

impl Sink for ViolationCollector {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let line_number = mat.line_number().unwrap_or(0);
        let line_text = std::str::from_utf8(mat.bytes()).unwrap_or("").trim_end();
        if self.rule.is_violation(line_text) {
            self.violations.push(format!("{line_number}:{line_text}"));
        }
        Ok(true)
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*")
}

fn is_doc_comment(trimmed: &str) -> bool {
    trimmed.starts_with("///") || trimmed.starts_with("//!")
}

// Extracts the text of a line that is entirely a comment.
fn comment_text(trimmed: &str) -> Option<&str> {
    if is_doc_comment(trimmed) {
        Some(trimmed[3..].trim())
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        Some(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("/*") {
        Some(rest.split("*/").next().unwrap_or("").trim())
    } else {
        None
    }
}

// True when every underscore-prefixed token on the line sits inside a string literal.
fn underscore_only_in_strings(line_text: &str) -> bool {
    line_text.contains('"')
        && line_text
            .split('"')
            .enumerate()
            .any(|(i, part)| i % 2 == 1 && part.contains('_'))
}

fn rust_sources() -> Vec<PathBuf> {
    SOURCE_DIRS
        .iter()
        .flat_map(|dir| WalkDir::new(dir).into_iter().filter_map(|e| e.ok()))
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| e.into_path())
        .collect()
}

fn scan(rule: Rule, files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let matcher = RegexMatcher::new_line_matcher(rule.pattern())?;
    let mut searcher = Searcher::new();

    for path in files {
        let mut collector = ViolationCollector {
            rule,
            violations: Vec::new(),
        };
        searcher.search_path(&matcher, path, &mut collector)?;
        if !collector.violations.is_empty() {
            return Err(format_violations(path, rule, &collector.violations).into());
        }
    }
    Ok(())
}

fn format_violations(path: &Path, rule: Rule, violations: &[String]) -> String {
    let mut message = format!(
        "\n❌ ERROR: Found {} code policy violations in {}:\n",
        violations.len(),
        path.display()
    );
    for violation in violations {
        message.push_str(&format!("   {violation}\n"));
    }
    message.push_str(&format!("\n⚠️ {}\n", rule.explanation()));
    message
}

fn main() {
    // Always rerun this script if the build script itself changes.
    println!("cargo:rerun-if-changed=build.rs");
    for dir in SOURCE_DIRS {
        println!("cargo:rerun-if-changed={dir}");
    }

    let files = rust_sources();
    for rule in [
        Rule::UnderscorePrefix,
        Rule::ForbiddenWord,
        Rule::StarsInComment,
        Rule::AllCapsComment,
        Rule::AllowDeadCode,
    ] {
        if let Err(e) = scan(rule, &files) {
            // The `eprintln!` here is crucial for showing the error in `cargo`'s output.
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
