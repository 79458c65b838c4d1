//! Module Context Resolution.
//!
//! Works out which ERP screen a request came from by looking at the loosely
//! structured context map the frontend sends along with the question.
//! An explicit `type` field wins; otherwise the map's keys are sniffed in a
//! fixed priority order, ending in the products screen.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Context map as received from the frontend (module or product form data).
pub type ContextMap = Map<String, Value>;

/// Business module (screen) of the ERP a request pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleTag {
    #[serde(rename = "clientes")]
    Customers,
    #[serde(rename = "vendas")]
    Sales,
    #[serde(rename = "transportadoras")]
    Carriers,
    #[serde(rename = "notas_fiscais")]
    Invoices,
    #[serde(rename = "usuarios")]
    Users,
    #[serde(rename = "empresa")]
    Company,
    #[serde(rename = "produtos")]
    Products,
}

impl ModuleTag {
    pub const ALL: [ModuleTag; 7] = [
        ModuleTag::Customers,
        ModuleTag::Sales,
        ModuleTag::Carriers,
        ModuleTag::Invoices,
        ModuleTag::Users,
        ModuleTag::Company,
        ModuleTag::Products,
    ];

    /// Screen identifier used in payloads, subcategories and tag tables.
    pub fn slug(&self) -> &'static str {
        match self {
            ModuleTag::Customers => "clientes",
            ModuleTag::Sales => "vendas",
            ModuleTag::Carriers => "transportadoras",
            ModuleTag::Invoices => "notas_fiscais",
            ModuleTag::Users => "usuarios",
            ModuleTag::Company => "empresa",
            ModuleTag::Products => "produtos",
        }
    }

    /// Value of the `type` field the frontend sends for this module.
    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleTag::Customers => "Clientes",
            ModuleTag::Sales => "Vendas",
            ModuleTag::Carriers => "Transportadoras",
            ModuleTag::Invoices => "Notas Fiscais",
            ModuleTag::Users => "Usuários",
            ModuleTag::Company => "Empresa",
            ModuleTag::Products => "Produtos",
        }
    }

    /// Exact (case-sensitive) match against the known type names.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.type_name() == name)
    }
}

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// How a module tag was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    /// The `type` field named a known module.
    TypeField,
    /// Module-specific keys were found in the map.
    KeySniffing,
    /// Nothing matched; products is assumed.
    Default,
}

/// Outcome of module resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleResolution {
    pub tag: ModuleTag,
    pub resolved_by: ResolvedBy,
    /// Raw `type` field, when present and non-empty (known or not).
    pub declared_type: Option<String>,
}

impl ModuleResolution {
    /// True when the module was named explicitly by the `type` field.
    pub fn is_explicit(&self) -> bool {
        self.resolved_by == ResolvedBy::TypeField
    }

    /// Module name sent to the assistant (`modulo_nome`).
    pub fn module_name(&self) -> &str {
        self.declared_type.as_deref().unwrap_or("Sistema")
    }
}

/// Key fragments that identify a module when no `type` is given, in priority order.
const SNIFFING_RULES: &[(ModuleTag, &[&str])] = &[
    (ModuleTag::Customers, &["clienteNome", "clienteTipo", "clienteDocumento"]),
    (ModuleTag::Sales, &["vendaNumero", "vendaCliente", "vendaTotal"]),
    (ModuleTag::Carriers, &["transpNome", "transpCnpj", "transpRegiao"]),
    (ModuleTag::Invoices, &["nfNumero", "nfSerie", "nfTipo"]),
    (ModuleTag::Users, &["usuarioNome", "usuarioLogin", "usuarioPerfil"]),
    (ModuleTag::Company, &["empresaNome", "empresaCnpj", "empresaFantasia"]),
];

/// Resolve the module a context map belongs to. Total and side-effect free.
pub fn resolve(context: &ContextMap) -> ModuleResolution {
    let declared_type = field_text(context, "type");

    if let Some(tag) = declared_type.as_deref().and_then(ModuleTag::from_type_name) {
        return ModuleResolution {
            tag,
            resolved_by: ResolvedBy::TypeField,
            declared_type,
        };
    }

    // A product category is the strongest structural hint.
    if field_text(context, "category").is_some() {
        return ModuleResolution {
            tag: ModuleTag::Products,
            resolved_by: ResolvedBy::KeySniffing,
            declared_type,
        };
    }

    for (tag, keys) in SNIFFING_RULES {
        if keys.iter().any(|key| context.contains_key(*key)) {
            return ModuleResolution {
                tag: *tag,
                resolved_by: ResolvedBy::KeySniffing,
                declared_type,
            };
        }
    }

    ModuleResolution {
        tag: ModuleTag::Products,
        resolved_by: ResolvedBy::Default,
        declared_type,
    }
}

/// Truthiness of a loosely typed form value: null, false, zero, empty strings
/// and empty collections are "not filled in".
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a filled-in field as text (numbers and booleans included).
pub fn field_text(map: &ContextMap, key: &str) -> Option<String> {
    let value = map.get(key).filter(|v| is_filled(v))?;
    Some(value_text(value))
}

/// Text rendering of a JSON value without quoting strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The nested `data` object of a module context, if any.
pub fn module_data(context: &ContextMap) -> Option<&ContextMap> {
    context.get("data").and_then(Value::as_object)
}

/// A filled-in field of the nested `data` object.
pub fn data_field(context: &ContextMap, key: &str) -> Option<String> {
    module_data(context).and_then(|data| field_text(data, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> ContextMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_type_field_wins() {
        let resolution = resolve(&map(json!({"type": "Clientes", "category": "eletronicos"})));
        assert_eq!(resolution.tag, ModuleTag::Customers);
        assert!(resolution.is_explicit());
        assert_eq!(resolution.module_name(), "Clientes");
    }

    #[test]
    fn test_every_type_name_round_trips() {
        for tag in ModuleTag::ALL {
            let resolution = resolve(&map(json!({ "type": tag.type_name() })));
            assert_eq!(resolution.tag, tag);
            assert_eq!(resolution.resolved_by, ResolvedBy::TypeField);
        }
    }

    #[test]
    fn test_type_match_is_exact() {
        let resolution = resolve(&map(json!({"type": "clientes"})));
        assert_eq!(resolution.tag, ModuleTag::Products);
        assert_eq!(resolution.resolved_by, ResolvedBy::Default);
        assert_eq!(resolution.declared_type.as_deref(), Some("clientes"));
    }

    #[test]
    fn test_key_sniffing_priority() {
        let resolution = resolve(&map(json!({"vendaNumero": 10, "nfNumero": 3})));
        assert_eq!(resolution.tag, ModuleTag::Sales);
        assert_eq!(resolution.resolved_by, ResolvedBy::KeySniffing);

        let resolution = resolve(&map(json!({"category": "bebidas", "clienteNome": "Ana"})));
        assert_eq!(resolution.tag, ModuleTag::Products);
    }

    #[test]
    fn test_empty_category_is_ignored() {
        let resolution = resolve(&map(json!({"category": "", "empresaNome": "ACME"})));
        assert_eq!(resolution.tag, ModuleTag::Company);
    }

    #[test]
    fn test_default_is_products() {
        let resolution = resolve(&ContextMap::new());
        assert_eq!(resolution.tag, ModuleTag::Products);
        assert_eq!(resolution.resolved_by, ResolvedBy::Default);
        assert_eq!(resolution.module_name(), "Sistema");
    }

    #[test]
    fn test_field_text_truthiness() {
        let context = map(json!({"a": "", "b": 0, "c": 12, "d": "x", "e": null}));
        assert_eq!(field_text(&context, "a"), None);
        assert_eq!(field_text(&context, "b"), None);
        assert_eq!(field_text(&context, "c").as_deref(), Some("12"));
        assert_eq!(field_text(&context, "d").as_deref(), Some("x"));
        assert_eq!(field_text(&context, "e"), None);
        assert_eq!(field_text(&context, "missing"), None);
    }
}
