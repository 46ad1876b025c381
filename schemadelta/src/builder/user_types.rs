use super::checks::Checks;
use crate::differences::AttributeDifference;
use crate::options::CompareOptions;
use crate::snapshot::UserType;

pub(super) fn compare(first: &UserType, second: &UserType, options: &CompareOptions) -> AttributeDifference {
    let mut checks = Checks::new();

    checks.value("base type", first.base_type.as_str(), second.base_type.as_str());
    checks.optional("maximum length", &first.max_length, &second.max_length);
    checks.optional("precision", &first.precision, &second.precision);
    checks.optional("scale", &first.scale, &second.scale);
    checks.flag(("allowed null", "did not allow null"), first.is_nullable, second.is_nullable);
    checks.flag(("was table type", "was not table type"), first.is_table_type, second.is_table_type);
    if options.collation {
        checks.optional("collation", &first.collation_name, &second.collation_name);
    }

    checks.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_checks() {
        let first = UserType {
            max_length: Some(20),
            ..UserType::new("dbo", "Phone", "varchar")
        };
        let second = UserType {
            max_length: Some(32),
            is_nullable: false,
            ..UserType::new("dbo", "Phone", "varchar")
        };
        assert_eq!(
            compare(&first, &second, &CompareOptions::all()).discrepancies,
            vec![
                "maximum length is different: database 1 value: 20, database 2 value: 32",
                "allowed null in database 1 and did not allow null in database 2",
            ]
        );
    }
}
