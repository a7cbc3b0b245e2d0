use std::fmt;

/// A named interpolation parameter, e.g. `("name", &"Kai")`.
pub type Param<'a> = (&'a str, &'a dyn fmt::Display);

/// Replace every `{{name}}` placeholder with its parameter's display text.
///
/// Parameters are applied one after another in the order given, each
/// replacing all of its occurrences. Placeholders without a matching
/// parameter are left untouched.
pub fn interpolate(template: &str, params: &[Param<'_>]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), &value.to_string())
        })
}
