use std::collections::BTreeSet;

/// Validation domain of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// One of a fixed set of identifiers, frozen at construction.
    Enumerated(BTreeSet<String>),
    /// Any string.
    Freeform,
}

impl ParamKind {
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamKind::Enumerated(values.into_iter().map(Into::into).collect())
    }

    /// Whether `value` is a member of the domain, spelled exactly.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            ParamKind::Enumerated(domain) => domain.contains(value),
            ParamKind::Freeform => true,
        }
    }

    /// Map user input onto a canonical domain value.
    ///
    /// Enumerated input matches exactly first, then by unique prefix. The
    /// error is a user-facing reason.
    pub fn accept(&self, input: &str) -> Result<String, String> {
        let domain = match self {
            ParamKind::Freeform => return Ok(input.to_string()),
            ParamKind::Enumerated(domain) => domain,
        };

        if input.is_empty() {
            return Err(format!("requires an argument, one of: {}", list(domain)));
        }

        if domain.contains(input) {
            return Ok(input.to_string());
        }

        let candidates: Vec<&String> = domain
            .iter()
            .filter(|value| value.starts_with(input))
            .collect();

        match candidates.as_slice() {
            [only] => Ok((*only).clone()),
            [] => Err(format!(
                "undefined item \"{input}\", expected one of: {}",
                list(domain)
            )),
            many => Err(format!(
                "ambiguous item \"{input}\", matches: {}",
                many.iter()
                    .map(|value| value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

fn list(domain: &BTreeSet<String>) -> String {
    domain
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::ParamKind;

    fn themes() -> ParamKind {
        ParamKind::enumerated(["classic", "cobalt", "kate", "solarized-dark"])
    }

    #[test]
    fn given_exact_id_when_accepted_then_returned_verbatim() {
        assert_eq!(themes().accept("cobalt"), Ok(String::from("cobalt")));
    }

    #[test]
    fn given_unique_prefix_when_accepted_then_expands_to_full_id() {
        assert_eq!(themes().accept("sol"), Ok(String::from("solarized-dark")));
    }

    #[test]
    fn given_ambiguous_prefix_when_accepted_then_lists_candidates() {
        let err = themes().accept("c").expect_err("ambiguous");

        assert!(err.contains("classic"));
        assert!(err.contains("cobalt"));
        assert!(!err.contains("kate"));
    }

    #[test]
    fn given_unknown_id_when_accepted_then_rejected() {
        let err = themes().accept("not-a-real-theme").expect_err("unknown");

        assert!(err.starts_with("undefined item"));
    }

    #[test]
    fn given_empty_input_when_enumerated_then_rejected() {
        assert!(themes().accept("").is_err());
    }

    #[test]
    fn given_freeform_kind_when_any_input_then_accepted() {
        assert_eq!(
            ParamKind::Freeform.accept("Courier-10"),
            Ok(String::from("Courier-10"))
        );
        assert!(ParamKind::Freeform.contains(""));
    }
}
