//! Collection parsing tests

use jsonstat::{Collection, JsonStatError, Selection};
use serde_json::json;

const OECD_CANADA: &str = r#"
{
    "oecd": {
        "label": "Unemployment rate in the OECD countries",
        "value": [11, 12, 13, 14, 21, 22, 23, 24, 31, 32, 33, 34],
        "dimension": {
            "id": ["year", "area"],
            "size": [3, 4],
            "year": { "category": { "index": { "2012": 0, "2013": 1, "2014": 2 } } },
            "area": {
                "category": {
                    "index": { "AU": 0, "AT": 1, "BE": 2, "IT": 3 },
                    "label": { "AU": "Australia", "AT": "Austria", "BE": "Belgium", "IT": "Italy" }
                }
            }
        }
    },
    "canada": {
        "label": "Population by sex",
        "value": [18, 17, 35],
        "dimension": {
            "id": ["sex"],
            "size": [3],
            "sex": {
                "category": {
                    "index": { "M": 0, "F": 1, "T": 2 },
                    "label": { "M": "male", "F": "female", "T": "total" }
                }
            }
        }
    }
}
"#;

#[test]
fn test_parse_collection() {
    let collection = Collection::from_string(OECD_CANADA).unwrap();
    assert_eq!(collection.len(), 2);
    // decoded document order (serde_json maps iterate sorted by key)
    assert_eq!(collection.names(), vec!["canada", "oecd"]);
}

#[test]
fn test_dataset_lookup_and_delegation() {
    let collection = Collection::from_string(OECD_CANADA).unwrap();

    let oecd = collection.dataset("oecd").unwrap();
    assert_eq!(oecd.name(), Some("oecd"));
    let spec = Selection::new().with("area", "AU").with("year", "2012");
    assert_eq!(oecd.value(&spec).unwrap(), &json!(11));

    let canada = collection.dataset("canada").unwrap();
    assert_eq!(canada.size(), 3);
    assert_eq!(canada.value(&Selection::new().with("sex", "female")).unwrap(), &json!(17));
}

#[test]
fn test_unknown_dataset() {
    let collection = Collection::from_string(OECD_CANADA).unwrap();
    let err = collection.dataset("eurostat").unwrap_err();
    assert!(matches!(err, JsonStatError::UnknownDataset { .. }));
    assert_eq!(
        err.to_string(),
        "unknown dataset 'eurostat' known dataset names are: canada, oecd"
    );
}

#[test]
fn test_invalid_member_fails_fast() {
    let doc = r#"
    {
        "bad": { "label": "no value here" },
        "canada": {
            "value": [1],
            "dimension": {
                "id": ["sex"],
                "size": [1],
                "sex": { "category": { "index": { "T": 0 } } }
            }
        }
    }
    "#;
    let err = Collection::from_string(doc).unwrap_err();
    assert_eq!(err.to_string(), "dataset 'bad': missing 'value' key");
}

#[test]
fn test_collection_not_an_object() {
    let err = Collection::from_string("[1, 2, 3]").unwrap_err();
    assert_eq!(err.to_string(), "dataset 'collection': document is not an object");
}

#[test]
fn test_non_object_entries_are_skipped() {
    let doc = r#"
    {
        "version": "1.0",
        "canada": {
            "value": [1],
            "dimension": {
                "id": ["sex"],
                "size": [1],
                "sex": { "category": { "index": { "T": 0 } } }
            }
        }
    }
    "#;
    let collection = Collection::from_string(doc).unwrap();
    assert_eq!(collection.names(), vec!["canada"]);
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.json");
    std::fs::write(&path, OECD_CANADA).unwrap();

    let collection = Collection::from_file(&path).unwrap();
    assert_eq!(collection.len(), 2);
}

#[test]
fn test_display() {
    let collection = Collection::from_string(OECD_CANADA).unwrap();
    let expected = concat!(
        "2 datasets:\n",
        "  0: dataset 'canada' size 3\n",
        "  1: dataset 'oecd' size 12\n",
    );
    assert_eq!(expected, collection.to_string());
}
