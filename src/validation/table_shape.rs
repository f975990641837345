//! Validation of compiled tables against per-tag table shapes.
//!
//! A table shape lists the columns a tag accepts, which of them every row must have, which values
//! they may take and which combinations are not allowed. Shapes are built from four layers of
//! configuration, embedded from `schemas/tables/`:
//!
//! 1. `veda_tags.yaml`: the columns of each tag
//! 2. `overrides.yaml`: layouts, extra columns, forbidden columns and derived variants for the tags
//!    the compiler emits
//! 3. `attributes.yaml`: attribute columns, along with their aliases
//! 4. `constraints.yaml`: groups of columns of which each row needs at least one
//!
//! Only canonical column names are accepted. Using an alias is an error which names the canonical
//! column to use instead.
use super::suggestion;
use crate::error::TableValidationError;
use crate::table_ir::{Row, TableIR};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const VEDA_TAGS: &str = include_str!("../../schemas/tables/veda_tags.yaml");
const OVERRIDES: &str = include_str!("../../schemas/tables/overrides.yaml");
const ATTRIBUTES: &str = include_str!("../../schemas/tables/attributes.yaml");
const CONSTRAINTS: &str = include_str!("../../schemas/tables/constraints.yaml");

/// How a table's data is laid out
#[derive(PartialEq, Eq, Debug, Clone, Copy, DeserializeLabeledStringEnum)]
pub enum LayoutKind {
    /// One row per data point, with the attribute named in a column
    #[string = "long"]
    Long,
    /// Attributes as column headers
    #[string = "wide"]
    Wide,
}

/// Layout rules for a table
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct TableLayout {
    /// The kind of layout
    pub kind: LayoutKind,
    /// Columns identifying a row, used in error messages
    #[serde(default)]
    pub index_fields: Vec<String>,
    /// Whether a generic `value` column is allowed
    #[serde(default = "default_allow_value_column")]
    pub allow_value_column: bool,
}

fn default_allow_value_column() -> bool {
    true
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            kind: LayoutKind::Long,
            index_fields: Vec::new(),
            allow_value_column: true,
        }
    }
}

/// A column of a table
#[derive(PartialEq, Debug, Clone)]
pub struct FieldSchema {
    /// The lower-case header used for this column
    pub canonical_header: String,
    /// Whether every row must have this column
    pub required: bool,
    /// Whether the column holds a comma-separated list
    pub multi_valued: bool,
    /// The values the column may take, if restricted
    pub valid_values: Option<BTreeSet<String>>,
}

/// The shape of a table tag
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TableSchema {
    /// Tag name, as written in the configuration
    pub tag_name: String,
    /// Variant suffix for derived tags (e.g. `at` for `~TFM_DINS-AT`)
    pub variant: Option<String>,
    /// Layout rules
    pub layout: TableLayout,
    /// Column definitions, keyed by field name
    pub fields: IndexMap<String, FieldSchema>,
    /// Every column allowed in the table
    pub allowed_columns: BTreeSet<String>,
    /// Columns every row must have
    pub required_columns: BTreeSet<String>,
    /// Columns which must not appear
    pub forbidden_headers: BTreeSet<String>,
    /// Groups of which at most one column may appear in a row
    pub mutually_exclusive_groups: Vec<BTreeSet<String>>,
    /// Groups of which at least one column must appear in a row
    pub require_any_of: Vec<BTreeSet<String>>,
}

#[derive(Deserialize)]
struct TagDefinition {
    tag_name: String,
    base_tag: Option<String>,
    #[serde(default)]
    valid_fields: Vec<FieldDefinition>,
}

#[derive(Deserialize)]
struct FieldDefinition {
    name: String,
    use_name: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    multi_valued: bool,
    valid_values: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct OverrideFile {
    tags: IndexMap<String, TagOverride>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TagOverride {
    derived_from: Option<String>,
    layout: Option<TableLayout>,
    optional_fields: Vec<String>,
    extra_columns: Vec<String>,
    forbidden_headers: Vec<String>,
    mutually_exclusive: Vec<Vec<String>>,
    attribute_columns: bool,
}

#[derive(Deserialize)]
struct AttributeFile {
    attributes: IndexMap<String, AttributeDefinition>,
}

/// An entry of the attribute master
#[derive(Deserialize)]
struct AttributeDefinition {
    column_header: Option<String>,
    #[serde(default)]
    column_headers: Vec<String>,
}

#[derive(Deserialize)]
struct ConstraintFile {
    #[serde(default)]
    tag_constraints: IndexMap<String, TagConstraints>,
}

#[derive(Deserialize)]
struct TagConstraints {
    #[serde(default)]
    any_of_fields: Vec<AnyOfFields>,
}

#[derive(Deserialize)]
struct AnyOfFields {
    fields: Vec<String>,
}

/// Normalise a tag to its lower-case name without the leading `~`
pub fn normalise_tag(tag: &str) -> String {
    tag.trim_start_matches('~').to_lowercase()
}

/// Build the base schema for a tag from its definition
fn schema_from_definition(definition: TagDefinition) -> TableSchema {
    let mut schema = TableSchema {
        tag_name: definition.tag_name,
        ..Default::default()
    };

    for field in definition.valid_fields {
        let name = field.use_name.unwrap_or(field.name);
        let canonical_header = name.to_lowercase();
        schema.allowed_columns.insert(canonical_header.clone());
        if field.required {
            schema.required_columns.insert(canonical_header.clone());
        }
        schema.fields.insert(
            name,
            FieldSchema {
                canonical_header,
                required: field.required,
                multi_valued: field.multi_valued,
                valid_values: field.valid_values.map(|values| values.into_iter().collect()),
            },
        );
    }

    schema
}

/// All the table shapes, along with the alias dictionary used for error messages
#[derive(Debug, Default)]
pub struct TableSchemas {
    schemas: BTreeMap<String, TableSchema>,
    aliases: BTreeMap<String, String>,
}

impl TableSchemas {
    /// The table shapes built from the embedded configuration
    pub fn embedded() -> &'static TableSchemas {
        static SCHEMAS: OnceLock<TableSchemas> = OnceLock::new();
        SCHEMAS.get_or_init(|| {
            Self::from_config(VEDA_TAGS, OVERRIDES, ATTRIBUTES, CONSTRAINTS)
                .expect("Embedded table configuration is invalid")
        })
    }

    /// Build table shapes from the four configuration documents.
    ///
    /// # Arguments
    ///
    /// * `tags` - YAML list of tag definitions
    /// * `overrides` - YAML overrides for the tags the compiler emits
    /// * `attributes` - YAML attribute master
    /// * `constraints` - YAML require-any-of groups, keyed by tag
    pub fn from_config(
        tags: &str,
        overrides: &str,
        attributes: &str,
        constraints: &str,
    ) -> Result<Self> {
        let definitions: Vec<TagDefinition> =
            serde_yaml::from_str(tags).context("Invalid tag definitions")?;
        let overrides: OverrideFile =
            serde_yaml::from_str(overrides).context("Invalid tag overrides")?;
        let attributes: AttributeFile =
            serde_yaml::from_str(attributes).context("Invalid attribute master")?;
        let constraints: ConstraintFile =
            serde_yaml::from_str(constraints).context("Invalid tag constraints")?;

        // Variants are only created through overrides
        let mut schemas: BTreeMap<_, _> = definitions
            .into_iter()
            .filter(|definition| definition.base_tag.is_none())
            .map(|definition| {
                (
                    normalise_tag(&definition.tag_name),
                    schema_from_definition(definition),
                )
            })
            .collect();

        let attribute_columns: BTreeSet<_> = attributes
            .attributes
            .iter()
            .map(|(name, attribute)| {
                attribute
                    .column_header
                    .clone()
                    .unwrap_or_else(|| name.clone())
                    .to_lowercase()
            })
            .collect();

        for (tag, tag_override) in overrides.tags {
            let tag = normalise_tag(&tag);
            let mut schema = match &tag_override.derived_from {
                Some(base) => {
                    let base = schemas
                        .get(&normalise_tag(base))
                        .with_context(|| format!("Tag '{tag}' derives from unknown tag '{base}'"))?;
                    let variant = tag.rsplit_once('-').map(|(_, suffix)| suffix.to_string());
                    TableSchema {
                        tag_name: tag.clone(),
                        variant,
                        fields: base.fields.clone(),
                        allowed_columns: base.allowed_columns.clone(),
                        required_columns: base.required_columns.clone(),
                        ..Default::default()
                    }
                }
                None => match schemas.remove(&tag) {
                    Some(schema) => schema,
                    None => continue,
                },
            };

            if let Some(layout) = tag_override.layout {
                schema.layout = layout;
            }
            for field_name in &tag_override.optional_fields {
                if let Some(field) = schema.fields.get_mut(field_name) {
                    field.required = false;
                    schema.required_columns.remove(&field.canonical_header);
                }
            }
            schema.allowed_columns.extend(tag_override.extra_columns);
            schema.forbidden_headers.extend(tag_override.forbidden_headers);
            schema.mutually_exclusive_groups.extend(
                tag_override
                    .mutually_exclusive
                    .into_iter()
                    .map(|group| group.into_iter().collect()),
            );
            if tag_override.attribute_columns {
                schema
                    .allowed_columns
                    .extend(attribute_columns.iter().cloned());
            }
            schemas.insert(tag, schema);
        }

        for (tag, rules) in constraints.tag_constraints {
            if let Some(schema) = schemas.get_mut(&normalise_tag(&tag)) {
                schema.require_any_of.extend(rules.any_of_fields.into_iter().map(|group| {
                    group.fields.iter().map(|f| f.to_lowercase()).collect()
                }));
            }
        }

        let mut aliases = BTreeMap::new();
        for (name, attribute) in attributes.attributes {
            let canonical = attribute.column_header.unwrap_or(name).to_lowercase();
            for alias in attribute.column_headers {
                let alias = alias.to_lowercase();
                if alias != canonical {
                    aliases.insert(alias, canonical.clone());
                }
            }
        }

        Ok(Self { schemas, aliases })
    }

    /// The shape for a tag, if one is defined
    pub fn get(&self, tag: &str) -> Option<&TableSchema> {
        self.schemas.get(&normalise_tag(tag))
    }

    /// The canonical column for an alias, if it is one
    pub fn canonical_name(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Check the rows of one table against its shape.
    ///
    /// # Arguments
    ///
    /// * `tag` - The table's tag, used in messages
    /// * `rows` - The table's rows
    /// * `schema` - The shape to check against
    ///
    /// # Returns
    ///
    /// Every violation found, table-level ones first.
    pub fn validate_rows(&self, tag: &str, rows: &[Row], schema: &TableSchema) -> Vec<String> {
        let mut errors = Vec::new();
        if rows.is_empty() {
            return errors;
        }

        let all_columns: BTreeSet<String> = rows
            .iter()
            .flat_map(|row| row.keys().map(|key| key.to_lowercase()))
            .collect();

        if !schema.layout.allow_value_column && all_columns.contains("value") {
            errors.push(format!(
                "{tag}: 'value' column not allowed - use attribute columns instead"
            ));
        }

        for column in all_columns.intersection(&schema.forbidden_headers) {
            errors.push(format!(
                "{tag}: forbidden column '{column}' not allowed in this table variant"
            ));
        }

        if !schema.allowed_columns.is_empty() {
            let unknown = all_columns
                .difference(&schema.allowed_columns)
                .filter(|column| !schema.forbidden_headers.contains(*column))
                .filter(|column| schema.layout.allow_value_column || *column != "value");
            for column in unknown {
                match self.canonical_name(column) {
                    Some(canonical) => errors.push(format!(
                        "{tag}: '{column}' is an alias column. Use canonical name '{canonical}' \
                         instead."
                    )),
                    None => errors.push(format!(
                        "{tag}: unknown column '{column}'.{}",
                        suggestion(column, schema.allowed_columns.iter().map(String::as_str))
                    )),
                }
            }
        }

        for (i, row) in rows.iter().enumerate() {
            let row_id = format_row_id(row, &schema.layout.index_fields, i);
            let row_columns: BTreeSet<String> = row.keys().map(|key| key.to_lowercase()).collect();

            for column in schema.required_columns.difference(&row_columns) {
                errors.push(format!(
                    "{tag} {row_id}: missing required column '{column}'"
                ));
            }

            for group in &schema.require_any_of {
                if group.is_disjoint(&row_columns) {
                    errors.push(format!(
                        "{tag} {row_id}: must have at least one of [{}]",
                        group.iter().join(", ")
                    ));
                }
            }

            for (name, field) in &schema.fields {
                let Some(valid_values) = &field.valid_values else {
                    continue;
                };
                let value = row
                    .iter()
                    .find(|(key, _)| key.to_lowercase() == field.canonical_header)
                    .map(|(_, value)| value.to_string());
                let Some(value) = value else {
                    continue;
                };
                let items = if field.multi_valued {
                    value.split(',').map(str::trim).collect_vec()
                } else {
                    vec![value.as_str()]
                };
                for item in items.into_iter().filter(|item| !valid_values.contains(*item)) {
                    errors.push(format!(
                        "{tag} {row_id}: invalid value '{item}' for '{name}'. Must be one of: {}",
                        valid_values.iter().join(", ")
                    ));
                }
            }

            for group in &schema.mutually_exclusive_groups {
                let present = group
                    .iter()
                    .filter(|name| {
                        schema
                            .fields
                            .get(*name)
                            .is_some_and(|field| row_columns.contains(&field.canonical_header))
                    })
                    .collect_vec();
                if present.len() > 1 {
                    errors.push(format!(
                        "{tag} {row_id}: mutually exclusive fields present: {}",
                        present.iter().join(", ")
                    ));
                }
            }
        }

        errors
    }

    /// Check every table of a TableIR document.
    ///
    /// Tables whose tag has no shape are skipped. Each error is prefixed with the file and sheet
    /// containing the table.
    pub fn validate_table_ir(&self, table_ir: &TableIR) -> Vec<String> {
        table_ir
            .iter_tables()
            .filter_map(|(file, sheet, table)| {
                let schema = self.get(&table.tag)?;
                Some(
                    self.validate_rows(&table.tag, &table.rows, schema)
                        .into_iter()
                        .map(move |error| format!("{}/{}: {error}", file.path, sheet.name)),
                )
            })
            .flatten()
            .collect()
    }
}

/// Identify a row in error messages by its number and index columns
fn format_row_id(row: &Row, index_fields: &[String], i: usize) -> String {
    let parts = index_fields
        .iter()
        .filter_map(|field| Some(format!("{field}={}", row.get(field)?)));
    let parts = std::iter::once(format!("row {}", i + 1)).chain(parts);
    format!("({})", parts.format(", "))
}

/// Check compiled tables against the embedded table shapes.
///
/// Fails with a [`TableValidationError`] listing every violation.
pub fn check_table_shapes(table_ir: &TableIR) -> Result<()> {
    let errors = TableSchemas::embedded().validate_table_ir(table_ir);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TableValidationError { errors }.into())
    }
}
