use crate::extractor::{ExtractedParameters, ParamValue};
use crate::registry::BaselineRule;
use crate::utils::canonical_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    Pass,
    /// The rule reads a role whose value is unknown, so it cannot be decided
    Unresolved,
    Violated(String),
}

pub(crate) fn evaluate(rule: &BaselineRule, params: &ExtractedParameters) -> RuleOutcome {
    match rule {
        BaselineRule::Flag { reason, .. } => RuleOutcome::Violated(render(reason, &[])),

        BaselineRule::AtLeast {
            role, min, reason, ..
        } => match params.get(role).as_int() {
            None => RuleOutcome::Unresolved,
            Some(value) if value < *min => RuleOutcome::Violated(render(
                reason,
                &[("value", value.to_string()), ("min", min.to_string())],
            )),
            Some(_) => RuleOutcome::Pass,
        },

        BaselineRule::OneOf {
            role,
            values,
            reason,
            ..
        } => match params.get(role).as_int() {
            None => RuleOutcome::Unresolved,
            Some(value) if !values.contains(&value) => RuleOutcome::Violated(render(
                reason,
                &[("value", value.to_string()), ("expected", join_ints(values))],
            )),
            Some(_) => RuleOutcome::Pass,
        },

        BaselineRule::Denied {
            role,
            values,
            reason,
            ..
        } => match identifier(params.get(role)) {
            None => RuleOutcome::Unresolved,
            Some(value) if listed(&value, values) => {
                RuleOutcome::Violated(render(reason, &[("value", value)]))
            }
            Some(_) => RuleOutcome::Pass,
        },

        BaselineRule::Allowed {
            role,
            values,
            reason,
            ..
        } => match identifier(params.get(role)) {
            None => RuleOutcome::Unresolved,
            Some(value) if !listed(&value, values) => RuleOutcome::Violated(render(
                reason,
                &[("value", value), ("expected", values.join("/"))],
            )),
            Some(_) => RuleOutcome::Pass,
        },

        BaselineRule::MatchesRole {
            role,
            other,
            reason,
            ..
        } => match (params.get(role).as_int(), params.get(other).as_int()) {
            (Some(value), Some(expected)) if value != expected => RuleOutcome::Violated(render(
                reason,
                &[("value", value.to_string()), ("expected", expected.to_string())],
            )),
            (Some(_), Some(_)) => RuleOutcome::Pass,
            _ => RuleOutcome::Unresolved,
        },

        BaselineRule::AtLeastWhen {
            role,
            min,
            when_role,
            when_values,
            reason,
            ..
        } => match identifier(params.get(when_role)) {
            None => RuleOutcome::Unresolved,
            Some(condition) if !listed(&condition, when_values) => RuleOutcome::Pass,
            Some(_) => match params.get(role).as_int() {
                None => RuleOutcome::Unresolved,
                Some(value) if value < *min => RuleOutcome::Violated(render(
                    reason,
                    &[("value", value.to_string()), ("min", min.to_string())],
                )),
                Some(_) => RuleOutcome::Pass,
            },
        },
    }
}

/// Roles whose unknown value keeps `rule` from being decided. A conditional
/// rule only needs its guarded role once the condition holds.
pub(crate) fn unresolved_roles<'a>(
    rule: &'a BaselineRule,
    params: &ExtractedParameters,
) -> Vec<&'a str> {
    match rule {
        BaselineRule::AtLeastWhen {
            role,
            when_role,
            when_values,
            ..
        } => match identifier(params.get(when_role)) {
            None => vec![when_role.as_str()],
            Some(condition) if listed(&condition, when_values) && params.is_unknown(role) => {
                vec![role.as_str()]
            }
            Some(_) => vec![],
        },
        _ => rule
            .referenced_roles()
            .into_iter()
            .filter(|role| params.is_unknown(role))
            .collect(),
    }
}

fn identifier(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Text(text) => Some(text.clone()),
        ParamValue::Int(number) => Some(number.to_string()),
        ParamValue::Unknown => None,
    }
}

fn listed(value: &str, values: &[String]) -> bool {
    let needle = canonical_identifier(value);
    values.iter().any(|v| canonical_identifier(v) == needle)
}

fn join_ints(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

fn render(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}
