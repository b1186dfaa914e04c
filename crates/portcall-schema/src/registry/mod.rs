//! # Type Registry
//!
//! Canonical definition of every named type, keyed by schema version.
//!
//! ## Design
//!
//! A schema generation is declared once as a table of [`TypeDef`]s plus the
//! closed [`EventTypeTable`]. [`SchemaBuilder::build`] checks the whole
//! declaration before any event is validated against it:
//!
//! - every type reference resolves,
//! - union discriminator values are unique and each variant is an object
//!   declaring the discriminator field,
//! - conditional groups only name declared fields.
//!
//! A built [`EventSchema`] is never mutated. [`TypeRegistry`] maps versions to
//! schemas, one schema per version.
//!
//! ## Hot Reload
//!
//! [`SharedRegistry`] holds the current registry behind
//! `parking_lot::RwLock<Arc<TypeRegistry>>`. Publishing swaps the `Arc`
//! whole; a validation call takes one snapshot at entry, so in-flight calls
//! keep the rule set they started with.

pub mod rules;
pub mod v3_2_1;

use parking_lot::RwLock;
use portcall_core::{EventType, SchemaVersion};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

pub use rules::{
    ArrayRule, Bound, ConditionalGroup, EnumRule, FieldRule, Format, ObjectRule, Pattern,
    ScalarKind, ScalarRule, TypeDef, UnionRule, UnknownFields, Variant,
};

use crate::error::SchemaError;
use crate::violation::{Path, Segment};

/// Name of the scalar type `eventType` is declared with. The exporter
/// replaces its pattern with the combination table.
pub const EVENT_TYPE_DEF: &str = "EventTypeLiteral";

/// The closed set of valid `activity.timeType.party` triples.
#[derive(Debug, Clone, Default)]
pub struct EventTypeTable {
    entries: Vec<EventType>,
    index: HashSet<EventType>,
}

impl EventTypeTable {
    /// Builds the table from raw declarations.
    ///
    /// Declarations are trimmed and deduplicated (each logged at `warn`),
    /// then parsed against the core vocabularies.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Vocabulary`] if a declaration does not name a
    /// known activity, time type, and party.
    pub fn from_declarations(raw: &[&str]) -> Result<Self, SchemaError> {
        let mut table = Self::default();
        for declared in raw {
            let literal = declared.trim();
            if literal != *declared {
                tracing::warn!(declared = *declared, "trimmed whitespace from eventType declaration");
            }
            let event_type: EventType = literal.parse()?;
            if !table.index.insert(event_type) {
                tracing::warn!(literal, "dropped duplicate eventType declaration");
                continue;
            }
            table.entries.push(event_type);
        }
        Ok(table)
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.index.contains(event_type)
    }

    /// The permitted combination `value` names after trimming, if any.
    pub fn suggest(&self, value: &str) -> Option<EventType> {
        let event_type: EventType = value.trim().parse().ok()?;
        self.contains(&event_type).then_some(event_type)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EventType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire literals in declaration order.
    pub fn literals(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

/// One schema generation.
#[derive(Debug, Clone)]
pub struct EventSchema {
    version: SchemaVersion,
    root: String,
    types: BTreeMap<String, TypeDef>,
    event_types: EventTypeTable,
}

impl EventSchema {
    /// Starts declaring the schema for `version` rooted at object `root`.
    pub fn builder(version: SchemaVersion, root: &str) -> SchemaBuilder {
        SchemaBuilder {
            version,
            root: root.to_string(),
            types: BTreeMap::new(),
            event_types: EventTypeTable::default(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Name of the root object type.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The type declared as `name`.
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// The object type declared as `name`.
    pub fn object(&self, name: &str) -> Option<&ObjectRule> {
        match self.types.get(name)? {
            TypeDef::Object(rule) => Some(rule),
            _ => None,
        }
    }

    /// The scalar type declared as `name`.
    pub fn scalar(&self, name: &str) -> Option<&ScalarRule> {
        match self.types.get(name)? {
            TypeDef::Scalar(rule) => Some(rule),
            _ => None,
        }
    }

    /// All types, ordered by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Permitted `eventType` combinations.
    pub fn event_types(&self) -> &EventTypeTable {
        &self.event_types
    }

    /// Declaration position of each segment of `path`, starting at the root
    /// object.
    ///
    /// A field ranks by its index in the declaring object (for a union, in
    /// the first variant declaring it); an array element ranks by its index.
    /// Undeclared keys rank after every declared field, as does everything
    /// below them.
    pub fn declaration_rank(&self, path: &Path) -> Vec<usize> {
        let mut rank = Vec::with_capacity(path.depth());
        let mut current = Some(self.root.as_str());
        for segment in path.segments() {
            let def = current.and_then(|name| self.get(name));
            let step = match (segment, def) {
                (Segment::Field(field), Some(TypeDef::Object(rule))) => position(rule, field),
                (Segment::Field(field), Some(TypeDef::Union(rule))) => rule
                    .variants
                    .iter()
                    .filter_map(|variant| self.object(&variant.rule))
                    .find_map(|object| position(object, field)),
                (Segment::Index(index), Some(TypeDef::Array(rule))) => {
                    Some((*index, rule.items.as_str()))
                }
                (Segment::Index(index), _) => {
                    rank.push(*index);
                    current = None;
                    continue;
                }
                _ => None,
            };
            match step {
                Some((index, type_name)) => {
                    rank.push(index);
                    current = Some(type_name);
                }
                None => {
                    rank.push(usize::MAX);
                    current = None;
                }
            }
        }
        rank
    }
}

fn position<'a>(rule: &'a ObjectRule, field: &str) -> Option<(usize, &'a str)> {
    rule.fields
        .iter()
        .position(|f| f.name == field)
        .map(|index| (index, rule.fields[index].type_name.as_str()))
}

/// Accumulates declarations for one [`EventSchema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    version: SchemaVersion,
    root: String,
    types: BTreeMap<String, TypeDef>,
    event_types: EventTypeTable,
}

impl SchemaBuilder {
    /// Declares a named type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateType`] if the name is taken.
    pub fn define(&mut self, def: impl Into<TypeDef>) -> Result<(), SchemaError> {
        let def = def.into();
        let name = def.name().to_string();
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name, def);
        Ok(())
    }

    /// Sets the closed `eventType` combination table.
    pub fn event_types(&mut self, raw: &[&str]) -> Result<(), SchemaError> {
        self.event_types = EventTypeTable::from_declarations(raw)?;
        Ok(())
    }

    /// Checks the declarations and freezes them.
    pub fn build(self) -> Result<EventSchema, SchemaError> {
        match self.types.get(&self.root) {
            Some(TypeDef::Object(_)) => {}
            Some(_) => {
                return Err(SchemaError::InvalidDeclaration {
                    type_name: self.root.clone(),
                    reason: "root type must be an object".to_string(),
                })
            }
            None => {
                return Err(SchemaError::UnresolvedType {
                    referenced_by: format!("schema {}", self.version),
                    name: self.root.clone(),
                })
            }
        }

        for def in self.types.values() {
            self.check_references(def)?;
        }

        Ok(EventSchema {
            version: self.version,
            root: self.root,
            types: self.types,
            event_types: self.event_types,
        })
    }

    fn resolve(&self, referenced_by: &str, name: &str) -> Result<&TypeDef, SchemaError> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnresolvedType {
                referenced_by: referenced_by.to_string(),
                name: name.to_string(),
            })
    }

    fn check_references(&self, def: &TypeDef) -> Result<(), SchemaError> {
        match def {
            TypeDef::Scalar(_) | TypeDef::Enum(_) => Ok(()),
            TypeDef::Array(rule) => self.resolve(&rule.name, &rule.items).map(|_| ()),
            TypeDef::Object(rule) => {
                for field in &rule.fields {
                    self.resolve(&rule.name, &field.type_name)?;
                }
                if let Some(group) = &rule.group {
                    if let Some(missing) = group.fields.iter().find(|f| !rule.declares(f)) {
                        return Err(SchemaError::InvalidDeclaration {
                            type_name: rule.name.clone(),
                            reason: format!("conditional group names undeclared field '{missing}'"),
                        });
                    }
                    if group.min_present == 0 || group.min_present > group.fields.len() {
                        return Err(SchemaError::InvalidDeclaration {
                            type_name: rule.name.clone(),
                            reason: format!(
                                "conditional group requires {} of {} fields",
                                group.min_present,
                                group.fields.len()
                            ),
                        });
                    }
                }
                Ok(())
            }
            TypeDef::Union(rule) => {
                let mut tags = HashSet::new();
                for variant in &rule.variants {
                    if !tags.insert(variant.tag.as_str()) {
                        return Err(SchemaError::DuplicateDiscriminator {
                            union: rule.name.clone(),
                            tag: variant.tag.clone(),
                        });
                    }
                    let TypeDef::Object(object) = self.resolve(&rule.name, &variant.rule)? else {
                        return Err(SchemaError::InvalidDeclaration {
                            type_name: rule.name.clone(),
                            reason: format!("variant '{}' is not an object type", variant.rule),
                        });
                    };
                    if !object.declares(&rule.discriminator) {
                        return Err(SchemaError::InvalidDeclaration {
                            type_name: variant.rule.clone(),
                            reason: format!(
                                "union variant does not declare discriminator '{}'",
                                rule.discriminator
                            ),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

/// Versioned schemas. Read-only once shared.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    schemas: BTreeMap<SchemaVersion, Arc<EventSchema>>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of every schema generation shipped with this crate.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register(v3_2_1::schema()?)?;
        Ok(registry)
    }

    /// Adds a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateVersion`] if the version is already
    /// registered.
    pub fn register(&mut self, schema: EventSchema) -> Result<(), SchemaError> {
        let version = schema.version();
        if self.schemas.contains_key(&version) {
            return Err(SchemaError::DuplicateVersion(version));
        }
        tracing::debug!(%version, types = schema.types.len(), "registered schema");
        self.schemas.insert(version, Arc::new(schema));
        Ok(())
    }

    pub fn get(&self, version: &SchemaVersion) -> Option<&Arc<EventSchema>> {
        self.schemas.get(version)
    }

    /// Registered versions, ascending.
    pub fn versions(&self) -> Vec<SchemaVersion> {
        self.schemas.keys().copied().collect()
    }

    /// Highest registered version.
    pub fn latest(&self) -> Option<&Arc<EventSchema>> {
        self.schemas.values().next_back()
    }
}

/// Process-wide handle to the current registry.
///
/// Cloning the handle shares the same slot; a [`publish`](Self::publish)
/// through any clone is seen by every subsequent [`snapshot`](Self::snapshot).
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<TypeRegistry>>>,
}

impl SharedRegistry {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// The registry as of now. Later publishes do not affect it.
    pub fn snapshot(&self) -> Arc<TypeRegistry> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the registry, returning the previous one.
    pub fn publish(&self, registry: TypeRegistry) -> Arc<TypeRegistry> {
        let next = Arc::new(registry);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(versions = ?self.snapshot().versions(), "published type registry");
        previous
    }
}
