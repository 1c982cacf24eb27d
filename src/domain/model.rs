//! User records as delivered by the upstream users endpoint.
//!
//! Every entity keeps its known fields as [`Nullable`]s and collects any other
//! member of the JSON object into `additional_properties`, so a record can be
//! written back out without losing what the upstream sent, explicit `null`s
//! included.

use crate::utils::error::{Result, UsersError};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Members of a JSON object that did not match a known field.
pub type AdditionalProperties = HashMap<String, Value>;

/// A known member: `None` when the upstream left it out, `Some(None)` when it
/// sent `null`.
pub type Nullable<T> = Option<Option<T>>;

pub trait NullableField<T> {
    /// The member's value; absent and `null` both give `None`.
    fn value(&self) -> Option<&T>;
}

impl<T> NullableField<T> for Nullable<T> {
    fn value(&self) -> Option<&T> {
        self.as_ref().and_then(Option::as_ref)
    }
}

/// Marks a member as present even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Like [`present`], for integer ids that may arrive as `1.0`.
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Nullable<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<Number>::deserialize(deserializer)? {
        Some(number) => number,
        None => return Ok(Some(None)),
    };
    if let Some(id) = number.as_i64() {
        return Ok(Some(Some(id)));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(Some(f as i64)))
        }
        _ => Err(de::Error::custom(format_args!(
            "invalid value: {}, expected a whole number",
            number
        ))),
    }
}

/// A typed record that tolerates upstream schema changes.
pub trait SchemaTolerant: Serialize + DeserializeOwned {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// JSON member names mapped onto typed fields.
    const KNOWN_FIELDS: &'static [&'static str];

    fn additional_properties(&self) -> &AdditionalProperties;

    /// Builds the entity from one JSON object.
    ///
    /// A known member whose value has the wrong shape fails with
    /// [`UsersError::MalformedField`], naming the member's path (e.g.
    /// `crypto.coin`); unknown members never fail.
    fn from_json(value: Value) -> Result<Self> {
        serde_path_to_error::deserialize(value).map_err(|e| {
            let path = e.path().to_string();
            let inner = e.into_inner();
            let message = if path == "." {
                inner.to_string()
            } else {
                format!("{}: {}", path, inner)
            };
            UsersError::MalformedField {
                entity: Self::ENTITY,
                message,
            }
        })
    }

    /// Writes every known field the upstream sent, `null`s included, plus every
    /// additional property.
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Nullable<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub website: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub address: Nullable<Address>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub company: Nullable<Company>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub crypto: Nullable<Crypto>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub hair: Nullable<Hair>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub address: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub city: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub state: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub state_code: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub postal_code: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub coordinates: Nullable<Coordinates>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub country: Nullable<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub lat: Nullable<f64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub lng: Nullable<f64>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub department: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Nullable<String>,
    /// The company's own address, independent of the user's.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub address: Nullable<Address>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Crypto {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub coin: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wallet: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub network: Nullable<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hair {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub color: Nullable<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub hair_type: Nullable<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

impl SchemaTolerant for User {
    const ENTITY: &'static str = "User";
    const KNOWN_FIELDS: &'static [&'static str] = &[
        "id", "name", "username", "email", "phone", "website", "address", "company", "crypto",
        "hair",
    ];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl SchemaTolerant for Address {
    const ENTITY: &'static str = "Address";
    const KNOWN_FIELDS: &'static [&'static str] = &[
        "address",
        "city",
        "state",
        "stateCode",
        "postalCode",
        "coordinates",
        "country",
    ];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl SchemaTolerant for Coordinates {
    const ENTITY: &'static str = "Coordinates";
    const KNOWN_FIELDS: &'static [&'static str] = &["lat", "lng"];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl SchemaTolerant for Company {
    const ENTITY: &'static str = "Company";
    const KNOWN_FIELDS: &'static [&'static str] = &["name", "department", "title", "address"];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl SchemaTolerant for Crypto {
    const ENTITY: &'static str = "Crypto";
    const KNOWN_FIELDS: &'static [&'static str] = &["coin", "wallet", "network"];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl SchemaTolerant for Hair {
    const ENTITY: &'static str = "Hair";
    const KNOWN_FIELDS: &'static [&'static str] = &["color", "type"];

    fn additional_properties(&self) -> &AdditionalProperties {
        &self.additional_properties
    }
}

impl User {
    /// City of the user's own address, if the upstream sent one.
    pub fn city(&self) -> Option<&str> {
        self.address
            .value()
            .and_then(|a| a.city.value())
            .map(String::as_str)
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company
            .value()
            .and_then(|c| c.name.value())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extras(pairs: &[(&str, Value)]) -> AdditionalProperties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(value: &str) -> Nullable<String> {
        Some(Some(value.to_string()))
    }

    fn sample_user() -> User {
        let address = Address {
            address: text("1745 T Street Southeast"),
            city: text("Washington"),
            state: text("District of Columbia"),
            state_code: text("DC"),
            postal_code: text("20020"),
            coordinates: Some(Some(Coordinates {
                lat: Some(Some(38.867033)),
                lng: Some(Some(-76.979235)),
                additional_properties: extras(&[("accuracy", json!("rooftop"))]),
            })),
            country: text("United States"),
            additional_properties: AdditionalProperties::new(),
        };

        User {
            id: Some(Some(1)),
            name: text("Ann"),
            username: text("ann"),
            email: text("ann@example.com"),
            phone: Some(None),
            website: text(""),
            address: Some(Some(address)),
            company: Some(Some(Company {
                name: text("Dooley, Kozey and Cronin"),
                department: text("Engineering"),
                title: None,
                address: Some(Some(Address {
                    city: text("Boston"),
                    ..Address::default()
                })),
                additional_properties: extras(&[("ein", json!("977-175"))]),
            })),
            crypto: Some(Some(Crypto {
                coin: text("Bitcoin"),
                wallet: text("0xb9fc2fe63b2a6c003f1c324c3bfa53259162181a"),
                network: text("Ethereum (ERC20)"),
                additional_properties: AdditionalProperties::new(),
            })),
            hair: Some(Some(Hair {
                color: text("Brown"),
                hair_type: text("Curly"),
                additional_properties: AdditionalProperties::new(),
            })),
            additional_properties: extras(&[
                ("extra", json!("x")),
                ("age", json!(28)),
                ("tags", json!(["a", {"b": null}])),
                ("verified", json!(true)),
                ("nothing", Value::Null),
            ]),
        }
    }

    fn malformed_message(err: UsersError) -> (&'static str, String) {
        match err {
            UsersError::MalformedField { entity, message } => (entity, message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_preserves_known_and_unknown_fields() {
        let user = sample_user();
        let json = user.to_json().unwrap();
        let back = User::from_json(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_round_trip_of_every_entity() {
        let user = sample_user();
        let address = user.address.value().unwrap().clone();
        assert_eq!(Address::from_json(address.to_json().unwrap()).unwrap(), address);

        let coordinates = address.coordinates.value().unwrap().clone();
        assert_eq!(
            Coordinates::from_json(coordinates.to_json().unwrap()).unwrap(),
            coordinates
        );

        let company = user.company.value().unwrap().clone();
        assert_eq!(Company::from_json(company.to_json().unwrap()).unwrap(), company);

        let crypto = user.crypto.value().unwrap().clone();
        assert_eq!(Crypto::from_json(crypto.to_json().unwrap()).unwrap(), crypto);

        let hair = user.hair.value().unwrap().clone();
        assert_eq!(Hair::from_json(hair.to_json().unwrap()).unwrap(), hair);
    }

    #[test]
    fn test_unknown_members_land_in_additional_properties() {
        let user = User::from_json(json!({"id": 1, "name": "Ann", "extra": "x"})).unwrap();

        assert_eq!(user.id, Some(Some(1)));
        assert_eq!(user.name.value().map(String::as_str), Some("Ann"));
        assert_eq!(user.additional_properties, extras(&[("extra", json!("x"))]));
        assert!(user.address.is_none());
    }

    #[test]
    fn test_known_null_is_kept_apart_from_absent() {
        let input = json!({"id": 1, "phone": null});
        let user = User::from_json(input.clone()).unwrap();

        assert_eq!(user.phone, Some(None));
        assert_eq!(user.email, None);
        assert_eq!(user.phone.value(), None);
        assert!(user.additional_properties.is_empty());
        assert_eq!(user.to_json().unwrap(), input);
    }

    #[test]
    fn test_nested_known_nulls_are_written_back() {
        let input = json!({
            "id": null,
            "address": {"city": null, "coordinates": null},
            "company": null,
            "hair": {"type": null, "length": null}
        });
        let user = User::from_json(input.clone()).unwrap();

        assert_eq!(user.id, Some(None));
        assert_eq!(user.company, Some(None));
        assert_eq!(user.city(), None);
        assert_eq!(user.to_json().unwrap(), input);
    }

    #[test]
    fn test_serialize_uses_upstream_member_names() {
        let address = Address {
            state_code: text("DC"),
            postal_code: text("20020"),
            ..Address::default()
        };
        let json = address.to_json().unwrap();
        assert_eq!(json, json!({"stateCode": "DC", "postalCode": "20020"}));

        let hair = Hair {
            hair_type: text("Wavy"),
            ..Hair::default()
        };
        assert_eq!(hair.to_json().unwrap(), json!({"type": "Wavy"}));
    }

    #[test]
    fn test_known_fields_never_leak_into_additional_properties() {
        let mut object = serde_json::Map::new();
        for field in User::KNOWN_FIELDS {
            object.insert(field.to_string(), Value::Null);
        }
        object.insert("firstName".to_string(), json!("Emily"));
        let input = Value::Object(object);

        let user = User::from_json(input.clone()).unwrap();
        for field in User::KNOWN_FIELDS {
            assert!(!user.additional_properties().contains_key(*field));
        }
        assert_eq!(user.additional_properties().len(), 1);
        assert_eq!(user.to_json().unwrap(), input);

        let address = Address::from_json(json!({
            "address": "626 Main Street",
            "stateCode": "MS",
            "postalCode": "29112",
            "coordinates": {"lat": -77.16213, "lng": -92.084824, "alt": 12},
            "suite": "Apt. 556"
        }))
        .unwrap();
        for field in Address::KNOWN_FIELDS {
            assert!(!address.additional_properties().contains_key(*field));
        }
        assert_eq!(address.additional_properties().len(), 1);

        let coordinates = address.coordinates.value().unwrap();
        for field in Coordinates::KNOWN_FIELDS {
            assert!(!coordinates.additional_properties().contains_key(*field));
        }
        assert_eq!(coordinates.additional_properties()["alt"], json!(12));
    }

    #[test]
    fn test_absent_and_empty_strings_are_distinct() {
        let user = User::from_json(json!({"email": ""})).unwrap();
        assert_eq!(user.email, text(""));
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_nested_object_given_string_is_malformed() {
        let err = User::from_json(json!({"address": "not-an-object-as-expected"})).unwrap_err();
        let (entity, message) = malformed_message(err);
        assert_eq!(entity, "User");
        assert!(message.starts_with("address: "), "message was: {}", message);
        assert!(message.contains("Address"), "message was: {}", message);
    }

    #[test]
    fn test_string_field_given_number_is_malformed() {
        let err = Crypto::from_json(json!({"coin": 42})).unwrap_err();
        let (entity, message) = malformed_message(err);
        assert_eq!(entity, "Crypto");
        assert!(message.starts_with("coin: "), "message was: {}", message);

        let err = User::from_json(json!({"id": 7, "crypto": {"coin": 42}})).unwrap_err();
        let (entity, message) = malformed_message(err);
        assert_eq!(entity, "User");
        assert!(message.starts_with("crypto.coin: "), "message was: {}", message);
    }

    #[test]
    fn test_deeply_nested_error_names_full_path() {
        let err = User::from_json(json!({
            "company": {"address": {"coordinates": {"lat": "north"}}}
        }))
        .unwrap_err();
        let (_, message) = malformed_message(err);
        assert!(
            message.starts_with("company.address.coordinates.lat: "),
            "message was: {}",
            message
        );
    }

    #[test]
    fn test_integer_coordinates_are_accepted_as_decimals() {
        let coordinates = Coordinates::from_json(json!({"lat": 40, "lng": -74.5})).unwrap();
        assert_eq!(coordinates.lat, Some(Some(40.0)));
        assert_eq!(coordinates.lng, Some(Some(-74.5)));
    }

    #[test]
    fn test_whole_valued_float_id_is_accepted() {
        let user = User::from_json(json!({"id": 1.0})).unwrap();
        assert_eq!(user.id, Some(Some(1)));

        let user = User::from_json(json!({"id": -3.0})).unwrap();
        assert_eq!(user.id, Some(Some(-3)));
    }

    #[test]
    fn test_fractional_or_textual_id_is_malformed() {
        for id in [json!(1.5), json!("1"), json!(1e300)] {
            let err = User::from_json(json!({ "id": id })).unwrap_err();
            let (_, message) = malformed_message(err);
            assert!(message.starts_with("id: "), "message was: {}", message);
        }
    }

    #[test]
    fn test_user_accessors() {
        let user = sample_user();
        assert_eq!(user.city(), Some("Washington"));
        assert_eq!(user.company_name(), Some("Dooley, Kozey and Cronin"));
        assert_eq!(User::default().city(), None);
    }
}
