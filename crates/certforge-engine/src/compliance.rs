use certforge_model::{DetailRow, MeasuredProperty, Norm};

/// Build detail rows for every measured property against the norm
/// snapshot. A property with no matching norm stays informational
/// ("no standard defined") and is excluded from scoring; a matched
/// property is compliant iff the measured value lies inside the
/// inclusive range.
#[must_use]
pub fn evaluate_properties(norms: &[Norm], measured: &[MeasuredProperty]) -> Vec<DetailRow> {
    measured
        .iter()
        .map(|property| {
            match norms
                .iter()
                .find(|n| n.matches_property(&property.property_name, property.kind))
            {
                Some(norm) => DetailRow::scored(
                    norm.parameter_name.clone(),
                    property.kind,
                    norm.range(),
                    property.measured_value,
                ),
                None => DetailRow::informational(
                    property.property_name.clone(),
                    property.kind,
                    property.measured_value,
                ),
            }
        })
        .collect()
}
