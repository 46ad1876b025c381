use super::checks::Checks;
use crate::differences::AttributeDifference;
use crate::options::CompareOptions;
use crate::snapshot::Column;

/// Compare the attributes of a column present on both sides.
pub(super) fn compare(first: &Column, second: &Column, options: &CompareOptions) -> AttributeDifference {
    let mut checks = Checks::new();

    if options.ordinal_positions {
        checks.value("ordinal position", &first.ordinal_position, &second.ordinal_position);
    }
    checks.optional("default value", &first.default_value, &second.default_value);
    checks.flag(("allowed null", "did not allow null"), first.is_nullable, second.is_nullable);
    checks.value("data type", first.data_type.as_str(), second.data_type.as_str());
    checks.optional("custom data type", &first.custom_data_type(), &second.custom_data_type());
    checks.optional(
        "character maximum length",
        &first.character_maximum_length,
        &second.character_maximum_length,
    );
    checks.optional(
        "character octet length",
        &first.character_octet_length,
        &second.character_octet_length,
    );
    checks.optional("numeric precision", &first.numeric_precision, &second.numeric_precision);
    checks.optional(
        "numeric precision radix",
        &first.numeric_precision_radix,
        &second.numeric_precision_radix,
    );
    checks.optional("numeric scale", &first.numeric_scale, &second.numeric_scale);
    checks.optional("datetime precision", &first.datetime_precision, &second.datetime_precision);
    checks.optional("character set", &first.character_set_name, &second.character_set_name);
    if options.collation {
        checks.optional("collation", &first.collation_name, &second.collation_name);
    }

    checks.flag(("was identity", "was not identity"), first.is_identity, second.is_identity);
    if first.is_identity && second.is_identity {
        checks.optional("identity seed", &first.identity_seed, &second.identity_seed);
        checks.optional("identity increment", &first.identity_increment, &second.identity_increment);
    }

    checks.flag(("was computed", "was not computed"), first.is_computed, second.is_computed);
    if first.is_computed && second.is_computed {
        checks.definition(
            "computed definition",
            first.computed_definition.as_deref().unwrap_or_default(),
            second.computed_definition.as_deref().unwrap_or_default(),
            options.ignore_whitespace,
        );
    }

    checks.flag(("was row guid", "was not row guid"), first.is_rowguid, second.is_rowguid);
    checks.flag(("was sparse", "was not sparse"), first.is_sparse, second.is_sparse);

    checks.finish()
}
