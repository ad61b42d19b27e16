//! Line-oriented text form.

use tracing::debug;

use tqsave_common::latin1;

use crate::{
    DataType, Error, RecordCodec, RecordCollection, RecordId, Result, TypeHints, Value, Variable,
};

/// Line terminator written after every variable.
pub const LINE_ENDING: &str = "\r\n";

/// Text codec: one `name,v1;v2;…,` line per variable.
///
/// Lines are written with [`LINE_ENDING`] in the single-byte code page.
/// When reading, a field with no type hint is typed as Integer or Float only
/// if every value renders back to exactly the same text, otherwise as
/// String, so unknown fields are always written back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl RecordCodec for TextCodec {
    fn name(&self) -> &'static str {
        "text"
    }

    fn encode(&self, collection: &RecordCollection) -> Result<Vec<u8>> {
        let mut out = String::new();
        for variable in collection {
            check_encodable(variable)?;
            out.push_str(&variable.to_string());
            out.push_str(LINE_ENDING);
        }

        let bytes = latin1::encode(&out).map_err(|e| Error::Unencodable {
            name: collection.id().to_string(),
            reason: e.to_string(),
        })?;
        debug!(id = %collection.id(), variables = collection.len(), bytes = bytes.len(), "encoded text record");
        Ok(bytes)
    }

    fn decode(&self, id: RecordId, bytes: &[u8], hints: &dyn TypeHints) -> Result<RecordCollection> {
        let text = latin1::decode(bytes);
        let mut collection = RecordCollection::new(id);

        for (index, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            collection.push(parse_line(index + 1, line, hints)?);
        }

        debug!(id = %collection.id(), variables = collection.len(), bytes = bytes.len(), "decoded text record");
        Ok(collection)
    }
}

fn parse_line(line_number: usize, line: &str, hints: &dyn TypeHints) -> Result<Variable> {
    let (name, rest) = line.split_once(',').ok_or_else(|| Error::MalformedLine {
        line: line_number,
        reason: "missing ',' after the field name".to_string(),
    })?;
    if name.is_empty() {
        return Err(Error::MalformedLine {
            line: line_number,
            reason: "empty field name".to_string(),
        });
    }

    let rest = rest.strip_suffix(',').unwrap_or(rest);
    let texts: Vec<&str> = rest.split(';').collect();

    let values = match hints.data_type(name) {
        Some(data_type) => texts
            .iter()
            .map(|text| {
                Value::parse_text(data_type, text).ok_or_else(|| Error::InvalidTextValue {
                    name: name.to_string(),
                    data_type,
                    value: text.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        None => infer_values(&texts),
    };

    let data_type = values[0].data_type();
    Variable::new(name, data_type, values)
}

fn infer_values(texts: &[&str]) -> Vec<Value> {
    for data_type in [DataType::Integer, DataType::Float] {
        let parsed: Option<Vec<Value>> = texts
            .iter()
            .map(|text| Value::parse_text_exact(data_type, text))
            .collect();
        if let Some(values) = parsed {
            return values;
        }
    }
    texts.iter().map(|text| Value::String(text.to_string())).collect()
}

fn check_encodable(variable: &Variable) -> Result<()> {
    let unencodable = |reason: &str| Error::Unencodable {
        name: variable.name().to_string(),
        reason: reason.to_string(),
    };

    let name = variable.name();
    if name.is_empty() || name.contains([',', '\r', '\n']) {
        return Err(unencodable("field names must be non-empty without ',' or line breaks"));
    }
    for value in variable.values() {
        if let Value::String(s) | Value::WideString(s) = value {
            if s.contains(['\r', '\n']) {
                return Err(unencodable("values cannot contain line breaks"));
            }
            // ';' always separates values on decode, even in a single value.
            if s.contains(';') {
                return Err(unencodable("values cannot contain ';'"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::NoHints;

    fn decode(text: &str) -> RecordCollection {
        TextCodec
            .decode(RecordId::new("test.dbr"), text.as_bytes(), &NoHints)
            .unwrap()
    }

    #[test]
    fn test_encode_lines_in_order() {
        let collection = RecordCollection::with_variables(
            "test.dbr",
            vec![
                Variable::integer("health", 100),
                Variable::string("name", "Hero"),
                Variable::floats("scale", [1.0, 2.5]).unwrap(),
            ],
        );
        let bytes = TextCodec.encode(&collection).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "health,100,\r\nname,Hero,\r\nscale,1.000000;2.500000,\r\n"
        );
    }

    #[test]
    fn test_inference() {
        let c = decode("a,5,\nb,1.500000;2.000000,\nc,007,\nd,1.5,\ne,x;1,\nf,,\n");
        let types: Vec<_> = c.iter().map(Variable::data_type).collect();
        assert_eq!(
            types,
            vec![
                DataType::Integer,
                DataType::Float,
                DataType::String,
                DataType::String,
                DataType::String,
                DataType::String,
            ]
        );
        assert_eq!(c.get("b").unwrap().number_of_values(), 2);
        assert_eq!(c.get("f").unwrap().get_str(0).unwrap(), "");
    }

    #[test]
    fn test_unknown_fields_reencode_identically() {
        let text = "templateName,database\\templates\\item.tpl,\r\nvalue,007,\r\nratio,1.5,\r\nlist,a;b;c,\r\nempty,,\r\n";
        let c = decode(text);
        assert_eq!(TextCodec.encode(&c).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_hints_select_type() {
        let mut hints = HashMap::new();
        hints.insert("flag".to_string(), DataType::Boolean);
        hints.insert("blob".to_string(), DataType::Stream);
        hints.insert("level".to_string(), DataType::Float);

        let c = TextCodec
            .decode(RecordId::new("x"), b"flag,1,\nblob,cafe,\nlevel,3,\n", &hints)
            .unwrap();
        assert!(c.get("flag").unwrap().get_bool(0).unwrap());
        assert_eq!(c.get("blob").unwrap().get_stream(0).unwrap(), [0xCA, 0xFE]);
        assert_eq!(c.get("level").unwrap().get_f32(0).unwrap(), 3.0);

        let bad = TextCodec.decode(RecordId::new("x"), b"flag,yes,\n", &hints);
        assert!(matches!(bad, Err(Error::InvalidTextValue { .. })));
    }

    #[test]
    fn test_malformed_line_reports_number() {
        let result = TextCodec.decode(RecordId::new("x"), b"a,1,\n\nno comma here\n", &NoHints);
        assert!(matches!(result, Err(Error::MalformedLine { line: 3, .. })));
    }

    #[test]
    fn test_values_keep_commas() {
        let c = decode("description,one, two,\n");
        assert_eq!(c.get("description").unwrap().get_str(0).unwrap(), "one, two");
        assert_eq!(TextCodec.encode(&c).unwrap(), b"description,one, two,\r\n");
    }

    #[test]
    fn test_semicolon_in_value_rejected() {
        for variable in [
            Variable::string("description", "Sword; sharp"),
            Variable::wide_string("myPlayerName", "a;b"),
            Variable::new(
                "list",
                DataType::String,
                vec![Value::String("ok".into()), Value::String("not;ok".into())],
            )
            .unwrap(),
        ] {
            let c = RecordCollection::with_variables("x", vec![variable]);
            assert!(matches!(TextCodec.encode(&c), Err(Error::Unencodable { .. })));
        }
    }

    #[test]
    fn test_float_precision_survives() {
        let mut hints = HashMap::new();
        hints.insert("ratio".to_string(), DataType::Float);
        let original = RecordCollection::with_variables(
            "x",
            vec![Variable::floats("ratio", [0.123_456_79, 1e-7, 2.5]).unwrap()],
        );

        let bytes = TextCodec.encode(&original).unwrap();
        assert_eq!(bytes, b"ratio,0.12345679;0.0000001;2.500000,\r\n");
        let typed = TextCodec.decode(RecordId::new("x"), &bytes, &hints).unwrap();
        assert_eq!(typed, original);

        // Without hints the exact forms are still recognized as floats.
        let untyped = TextCodec.decode(RecordId::new("x"), &bytes, &NoHints).unwrap();
        assert_eq!(untyped, original);
    }

    #[test]
    fn test_line_breaks_rejected() {
        let c = RecordCollection::with_variables("x", vec![Variable::string("note", "a\nb")]);
        assert!(matches!(TextCodec.encode(&c), Err(Error::Unencodable { .. })));
    }
}
