//! Positional `ARG<i>` placeholder substitution.

use crate::ast::Node;
use crate::config::ArgSubstitution;
use crate::error::Result;

/// Fill `ARG1..ARGn` in `template` with the rendered `args`.
///
/// Placeholders are processed in ascending order against the partially
/// substituted text. With [`ArgSubstitution::FirstOccurrence`] only the first
/// literal occurrence of each token is replaced, so a template that names
/// `ARG1` twice keeps the second one verbatim.
pub fn substitute_args<F>(
    template: &str,
    args: &[Node],
    mode: ArgSubstitution,
    mut render: F,
) -> Result<String>
where
    F: FnMut(&Node) -> Result<String>,
{
    let mut result = template.to_string();

    for (i, arg) in args.iter().enumerate() {
        let placeholder = format!("ARG{}", i + 1);
        let value = render(arg)?;
        result = match mode {
            ArgSubstitution::FirstOccurrence => result.replacen(&placeholder, &value, 1),
            ArgSubstitution::AllOccurrences => result.replace(&placeholder, &value),
        };
    }

    Ok(result)
}
