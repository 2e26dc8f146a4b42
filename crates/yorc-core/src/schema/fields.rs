//! Declarative field table for the configuration decoder.
//!
//! Each entry names where an attribute may be found and how a JSON value is
//! coerced into it. Adding an option the generator started emitting is one
//! new row here plus the struct field.

use serde_json::{Map, Value};
use yorc_common::GeneratorOptions;

/// Where a value is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Key inside the generator configuration object.
    Config(&'static str),
    /// Key on the document root, next to the configuration object.
    Root(&'static str),
}

impl Location {
    pub(crate) fn lookup<'a>(self, root: &'a Map<String, Value>, config: &'a Map<String, Value>) -> Option<&'a Value> {
        match self {
            Location::Config(key) => config.get(key),
            Location::Root(key) => root.get(key),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Location::Config(key) | Location::Root(key) => key,
        }
    }
}

/// Setter for a field of [`GeneratorOptions`].
#[derive(Clone, Copy)]
pub enum Target {
    Text(fn(&mut GeneratorOptions) -> &mut String),
    Flag(fn(&mut GeneratorOptions) -> &mut bool),
}

/// How a JSON value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// String, or a number in its decimal form.
    Text,
    /// Bool; a string is true unless empty, `"no"` or `"false"`.
    Flag,
    /// True iff the value is an array containing this string. A bare bool
    /// is taken as is.
    Member(&'static str),
}

/// One row of the field table.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Candidate locations in priority order.
    pub locations: &'static [Location],
    pub coercion: Coercion,
    pub target: Target,
}

/// Result of applying one field to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A value was found and stored.
    Set,
    /// No location held a value; the default stays.
    Absent,
    /// A value was found but had the wrong shape; the default stays.
    Mismatched(Location),
}

impl FieldSpec {
    /// Store the first usable value, leaving the default when there is none.
    pub fn apply(
        &self,
        root: &Map<String, Value>,
        config: &Map<String, Value>,
        options: &mut GeneratorOptions,
    ) -> Applied {
        let mut outcome = Applied::Absent;
        for &location in self.locations {
            let Some(value) = location.lookup(root, config) else {
                continue;
            };
            let stored = match (self.coercion, self.target) {
                (Coercion::Text, Target::Text(field)) => coerce_text(value).map(|v| *field(options) = v),
                (Coercion::Flag, Target::Flag(field)) => coerce_flag(value).map(|v| *field(options) = v),
                (Coercion::Member(name), Target::Flag(field)) => {
                    coerce_member(value, name).map(|v| *field(options) = v)
                }
                _ => None,
            };
            if stored.is_some() {
                return Applied::Set;
            }
            if outcome == Applied::Absent {
                outcome = Applied::Mismatched(location);
            }
        }
        outcome
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(!matches!(s.trim(), "" | "no" | "false")),
        _ => None,
    }
}

fn coerce_member(value: &Value, name: &str) -> Option<bool> {
    match value {
        Value::Array(items) => Some(items.iter().any(|item| item.as_str() == Some(name))),
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

macro_rules! text {
    ($name:literal, $field:ident, [$($loc:expr),+ $(,)?]) => {
        FieldSpec {
            name: $name,
            locations: &[$($loc),+],
            coercion: Coercion::Text,
            target: Target::Text(|o| &mut o.$field),
        }
    };
}

macro_rules! flag {
    ($name:literal, $field:ident, [$($loc:expr),+ $(,)?]) => {
        FieldSpec {
            name: $name,
            locations: &[$($loc),+],
            coercion: Coercion::Flag,
            target: Target::Flag(|o| &mut o.$field),
        }
    };
}

macro_rules! test_framework {
    ($name:literal, $member:literal, $field:ident) => {
        FieldSpec {
            name: $name,
            locations: &[Location::Config("testFrameworks"), Location::Config($name)],
            coercion: Coercion::Member($member),
            target: Target::Flag(|o| &mut o.$field),
        }
    };
}

use Location::{Config, Root};

/// Every scalar attribute the decoder knows about.
pub static FIELDS: &[FieldSpec] = &[
    text!("jhipsterVersion", jhipster_version, [Config("jhipsterVersion"), Root("generator-version")]),
    text!("gitProvider", git_provider, [Root("git-provider"), Config("gitProvider")]),
    text!("nodeVersion", node_version, [Root("node-version"), Config("nodeVersion")]),
    text!("os", os, [Root("os"), Config("os")]),
    text!("arch", arch, [Root("arch"), Config("arch")]),
    text!("cpu", cpu, [Root("cpu"), Config("cpu")]),
    text!("cores", cores, [Root("cores"), Config("cores")]),
    text!("memory", memory, [Root("memory"), Config("memory")]),
    text!("userLanguage", user_language, [Root("user-language"), Config("userLanguage")]),
    text!("applicationType", application_type, [Config("applicationType")]),
    text!("authenticationType", authentication_type, [Config("authenticationType")]),
    text!("serverPort", server_port, [Config("serverPort")]),
    text!("cacheProvider", cache_provider, [Config("cacheProvider")]),
    flag!("enableHibernateCache", enable_hibernate_cache, [Config("enableHibernateCache")]),
    flag!("websocket", websocket, [Config("websocket")]),
    text!("databaseType", database_type, [Config("databaseType")]),
    text!("devDatabaseType", dev_database_type, [Config("devDatabaseType")]),
    text!("prodDatabaseType", prod_database_type, [Config("prodDatabaseType")]),
    flag!("searchEngine", search_engine, [Config("searchEngine")]),
    flag!("messageBroker", message_broker, [Config("messageBroker")]),
    flag!("serviceDiscoveryType", service_discovery_type, [Config("serviceDiscoveryType")]),
    text!("buildTool", build_tool, [Config("buildTool")]),
    flag!("enableSwaggerCodegen", enable_swagger_codegen, [Config("enableSwaggerCodegen")]),
    text!("clientFramework", client_framework, [Config("clientFramework")]),
    flag!("useSass", use_sass, [Config("useSass")]),
    text!("clientPackageManager", client_package_manager, [Config("clientPackageManager")]),
    flag!("enableTranslation", enable_translation, [Config("enableTranslation")]),
    text!("nativeLanguage", native_language, [Config("nativeLanguage")]),
    test_framework!("hasProtractor", "protractor", has_protractor),
    test_framework!("hasGatling", "gatling", has_gatling),
    test_framework!("hasCucumber", "cucumber", has_cucumber),
];

/// Keys holding the selected language list, in priority order.
pub static LANGUAGE_LOCATIONS: &[Location] = &[Config("languages"), Config("selectedLanguages")];
