//! Synthetic Go sources.

/// Field types cycled through by [`struct_source`].
const FIELD_TYPES: &[&str] = &[
    "string",
    "int64",
    "time.Time",
    "[]byte",
    "map[string]*sub.Item",
    "func(ctx context.Context) error",
    "chan<- int",
    "*Node",
];

/// Builds a package declaring `Node`, a struct with `fields` tagged fields.
///
/// Every field gets a getter and a setter; every third field also carries
/// a name override.
#[must_use]
pub fn struct_source(fields: usize) -> String {
    let mut src = String::from("package bench\n\nimport (\n");
    for import in ["\"context\"", "\"sync\"", "\"time\"", "", "sub \"example.com/bench/items\""] {
        if import.is_empty() {
            src.push('\n');
        } else {
            src.push_str(&format!("\t{import}\n"));
        }
    }
    src.push_str(")\n\n");
    src.push_str("type Node struct {\n\tmu sync.Mutex\n");
    for i in 0..fields {
        let ty = FIELD_TYPES[i % FIELD_TYPES.len()];
        if i % 3 == 0 {
            src.push_str(&format!(
                "\tfield{i} {ty} `json:\"f{i}\" wrapper:\"getter:Load{i},setter:Store{i}\"`\n"
            ));
        } else {
            src.push_str(&format!("\tfield{i} {ty} `wrapper:\"getter,setter\"`\n"));
        }
    }
    src.push_str("}\n");
    src
}

/// Builds a package with `types` structs of `fields` fields each, followed
/// by the `Node` struct of [`struct_source`].
#[must_use]
pub fn package_source(types: usize, fields: usize) -> String {
    let mut src = struct_source(fields);
    for t in 0..types {
        src.push_str(&format!("\ntype Filler{t} struct {{\n"));
        for i in 0..fields {
            src.push_str(&format!("\tvalue{i} int\n"));
        }
        src.push_str("}\n");
    }
    src
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_source_parses() {
        let package = wrapgen_schema::parse_source(&struct_source(16)).expect("parse");
        let node = package.find_type("Node").expect("Node");
        assert_eq!(node.fields.len(), 17);
    }

    #[test]
    fn test_package_source_parses() {
        let package = wrapgen_schema::parse_source(&package_source(4, 8)).expect("parse");
        assert_eq!(package.types.len(), 5);
    }
}
