/// Lexicon linting — finds problems that would surface at resolution time.

use rustc_hash::FxHashSet;

use crate::core::lexicon::{LexiconError, LexiconSource};
use crate::core::template::scan_placeholders;
use crate::schema::category::CategoryTypes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Process exit code for the linter: 1 when any error was found.
    pub fn exit_code(&self) -> i32 {
        if self.errors.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Check the lexicon behind `source`, and each of `templates` against it.
pub fn lint_lexicon<S>(source: &S, templates: &[String]) -> LintReport
where
    S: LexiconSource + ?Sized,
{
    let mut report = LintReport::default();

    let types = match source.try_load_category_types() {
        Ok(types) => types,
        Err(e @ LexiconError::CategoryTypesMissing(_)) => {
            report.warnings.push(format!("{e}; the built-in types will be used"));
            CategoryTypes::builtin_default()
        }
        Err(e) => {
            report.errors.push(e.to_string());
            CategoryTypes::builtin_default()
        }
    };

    for (name, cats) in types.iter() {
        if cats.is_empty() {
            report.errors.push(format!(
                "Type '{name}' has no categories; [{name}] would fail to resolve"
            ));
        }
    }

    for category in types.all_categories() {
        match source.try_load_words(&category) {
            Ok(words) if words.is_empty() => report
                .warnings
                .push(format!("Category '{category}' has no words")),
            Ok(_) => {}
            Err(LexiconError::UnknownCategory(_)) => report.warnings.push(format!(
                "Category '{category}' is listed but has no word list"
            )),
            Err(e) => report.errors.push(e.to_string()),
        }
    }

    for template in templates {
        lint_template(template, &types, source, &mut report);
    }

    report
}

fn lint_template<S>(template: &str, types: &CategoryTypes, source: &S, report: &mut LintReport)
where
    S: LexiconSource + ?Sized,
{
    let mut reported = FxHashSet::default();
    for placeholder in scan_placeholders(template) {
        if types.contains_type(&placeholder.token) || !reported.insert(placeholder.token.clone())
        {
            continue;
        }
        let alternatives = placeholder.alternatives();
        let known: Vec<&str> = alternatives
            .iter()
            .copied()
            .filter(|name| types.lists_category(name) || source.category_exists(name))
            .collect();
        if known.is_empty() {
            report.warnings.push(format!(
                "Template '{template}': [{}] matches nothing and will be left as written",
                placeholder.token
            ));
        } else if known.len() < alternatives.len() {
            report.warnings.push(format!(
                "Template '{template}': [{}] has alternatives with no word list",
                placeholder.token
            ));
        }
    }
}
