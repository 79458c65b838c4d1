//! Tag generation.
//!
//! Tags are gathered from several sources in a fixed order and then
//! deduplicated keeping the first occurrence:
//! 1. question cues (CRUD verbs, fields, ERP actions, integrations)
//! 2. conditional tags for an explicitly named module
//! 3. form state (filled in vs. empty)
//! 4. question length and form
//! 5. the screen's own tag set
//! 6. system tags
//!
//! Tags derived from the question and the form come first so the cap
//! trims the generic screen and system tables instead.

use super::complexity::ComplexityDetector;
use super::module_context::{
    is_filled, module_data, value_text, ContextMap, ModuleResolution, ModuleTag,
};

/// Maximum number of tags attached to a request
pub const MAX_TAGS: usize = 15;

const MODULE_TAGS: &[(ModuleTag, &[&str])] = &[
    (
        ModuleTag::Customers,
        &[
            "clientes", "customers", "crm", "cadastro_cliente", "pessoa_fisica",
            "pessoa_juridica", "cnpj", "cpf", "endereco", "contato", "relacionamento",
            "base_clientes",
        ],
    ),
    (
        ModuleTag::Products,
        &[
            "produtos", "products", "inventory", "catalogo", "estoque", "ean",
            "codigo_produto", "categoria", "preco", "descricao", "imagem", "referencia",
            "gestao_produtos",
        ],
    ),
    (
        ModuleTag::Sales,
        &[
            "vendas", "sales", "revenue", "faturamento", "pedidos", "orcamento", "proposta",
            "comissao", "meta", "pipeline", "funil", "conversao", "vendedor", "gestao_vendas",
        ],
    ),
    (
        ModuleTag::Carriers,
        &[
            "transportadoras", "shipping", "logistics", "frete", "entrega", "transporte",
            "logistica", "prazo", "rastreamento", "correios", "transportadora", "distribuicao",
        ],
    ),
    (
        ModuleTag::Invoices,
        &[
            "notas_fiscais", "fiscal", "nfe", "nfce", "nfse", "sefaz", "autorizacao",
            "cancelamento", "inutilizacao", "tributacao", "impostos", "chave_acesso", "xml",
        ],
    ),
    (
        ModuleTag::Users,
        &[
            "usuarios", "users", "acesso", "permissoes", "perfil", "login", "senha",
            "administrador", "vendedor", "operador", "seguranca", "autenticacao", "roles",
        ],
    ),
    (
        ModuleTag::Company,
        &[
            "empresa", "company", "dados_empresa", "cnpj", "razao_social",
            "inscricao_estadual", "configuracao", "parametros", "sede", "filial",
            "empresa_dados", "corporativo",
        ],
    ),
];

const CUE_TAGS: &[(&str, &[&str])] = &[
    // CRUD
    ("como", &["tutorial", "howto", "instrucoes"]),
    ("criar", &["create", "novo", "adicionar", "cadastrar"]),
    ("editar", &["edit", "alterar", "modificar", "atualizar"]),
    ("excluir", &["delete", "remover", "apagar"]),
    ("buscar", &["search", "localizar", "encontrar", "consultar"]),
    ("listar", &["list", "visualizar", "exibir", "mostrar"]),
    // problems
    ("erro", &["error", "problema", "bug", "falha"]),
    ("duvida", &["question", "help", "ajuda", "suporte"]),
    ("nao", &["not_working", "problema", "dificuldade"]),
    ("funciona", &["funcionamento", "operacao", "uso"]),
    // fields
    ("cnpj", &["documento", "fiscal", "empresa"]),
    ("cpf", &["documento", "pessoa_fisica", "individual"]),
    ("email", &["contato", "comunicacao", "endereco_eletronico"]),
    ("telefone", &["contato", "comunicacao", "fone"]),
    ("endereco", &["localizacao", "address", "cep"]),
    ("senha", &["password", "acesso", "login", "seguranca"]),
    ("preco", &["valor", "custo", "money", "financeiro"]),
    ("quantidade", &["qtd", "estoque", "inventory"]),
    ("data", &["date", "periodo", "tempo"]),
    ("status", &["situacao", "estado", "condicao"]),
    // ERP actions
    ("vender", &["comercial", "negocio", "revenue"]),
    ("comprar", &["aquisicao", "fornecedor", "procurement"]),
    ("entregar", &["delivery", "shipping", "logistica"]),
    ("faturar", &["billing", "invoice", "cobranca"]),
    ("pagar", &["payment", "financeiro", "contas"]),
    ("receber", &["receivables", "cobranca", "entrada"]),
    // reports
    ("relatorio", &["report", "dashboard", "analytics"]),
    ("consulta", &["query", "search", "lookup"]),
    ("historico", &["history", "log", "tracking"]),
    ("backup", &["backup", "copia", "seguranca"]),
    // integrations
    ("api", &["integration", "webservice", "endpoint"]),
    ("xml", &["arquivo", "dados", "export"]),
    ("excel", &["planilha", "import", "export"]),
    ("pdf", &["documento", "impressao", "relatorio"]),
    // urgency
    ("urgente", &["priority", "critico", "importante"]),
    ("rapido", &["fast", "agil", "quick"]),
    ("lento", &["slow", "performance", "otimizacao"]),
];

/// (module, question cues, tags added when any cue matches)
const CONDITIONAL_TAGS: &[(ModuleTag, &[&str], &[&str])] = &[
    (ModuleTag::Customers, &["cnpj", "empresa", "juridica"], &["pessoa_juridica", "corporativo", "b2b"]),
    (ModuleTag::Products, &["categoria", "tipo"], &["classificacao", "taxonomia"]),
    (ModuleTag::Products, &["estoque", "quantidade"], &["inventory_management", "stock_control"]),
    (ModuleTag::Sales, &["produto", "item"], &["produtos_venda", "carrinho", "itens"]),
    (ModuleTag::Sales, &["total", "valor"], &["calculo", "pricing", "financeiro"]),
    (ModuleTag::Invoices, &["nfe", "eletronica"], &["nfe", "sefaz", "digital"]),
    (ModuleTag::Invoices, &["cancelar", "inutilizar"], &["cancelamento", "fiscal_operations"]),
    (ModuleTag::Users, &["admin", "administrador"], &["admin_rights", "super_user"]),
    (ModuleTag::Users, &["perfil", "permissao"], &["access_control", "authorization"]),
];

// Individual customers only when the corporate cues did not match.
const CUSTOMER_INDIVIDUAL_CUES: &[&str] = &["cpf", "fisica", "individual"];
const CUSTOMER_INDIVIDUAL_TAGS: &[&str] = &["pessoa_fisica", "individual", "b2c"];

const FILLED_FORM_TAGS: &[&str] = &["edicao", "dados_preenchidos", "formulario_ativo"];
const EMPTY_FORM_TAGS: &[&str] = &["novo_registro", "formulario_vazio", "criacao"];
const SYSTEM_TAGS: &[&str] = &["mock_erp", "sistema_gestao", "erp", "web_interface"];

const EXPLANATORY_CUES: &[&str] = &["como", "onde", "quando", "porque", "qual"];
const ACTION_CUES: &[&str] = &["preciso", "quero", "gostaria"];

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Tag generator for classified requests
#[derive(Default)]
pub struct TagGenerator;

impl TagGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate at most [`MAX_TAGS`] distinct tags, in source order.
    pub fn generate(
        &self,
        question: &str,
        context: &ContextMap,
        module: &ModuleResolution,
    ) -> Vec<String> {
        let lower = question.to_lowercase();
        let mut raw: Vec<&str> = Vec::new();

        for (cue, tags) in CUE_TAGS {
            if lower.contains(cue) {
                raw.extend_from_slice(tags);
            }
        }

        if module.is_explicit() {
            raw.extend(self.conditional_tags(&lower, module.tag));
        }

        if let Some(filled) = form_state(context) {
            raw.extend_from_slice(if filled { FILLED_FORM_TAGS } else { EMPTY_FORM_TAGS });
        }

        raw.push(match ComplexityDetector::word_count(question) {
            0..=3 => "pergunta_simples",
            4..=8 => "pergunta_media",
            _ => "pergunta_complexa",
        });

        if question.contains('?') {
            raw.push("duvida_direta");
        }
        if contains_any(&lower, EXPLANATORY_CUES) {
            raw.push("pergunta_explicativa");
        }
        if contains_any(&lower, ACTION_CUES) {
            raw.push("solicitacao_acao");
        }

        if let Some((_, tags)) = MODULE_TAGS.iter().find(|(tag, _)| *tag == module.tag) {
            raw.extend_from_slice(tags);
        }
        raw.extend_from_slice(SYSTEM_TAGS);

        let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
        for tag in raw {
            if tags.len() == MAX_TAGS {
                break;
            }
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    fn conditional_tags(&self, lower: &str, tag: ModuleTag) -> Vec<&'static str> {
        let mut out = Vec::new();

        for (module, cues, tags) in CONDITIONAL_TAGS {
            if *module == tag && contains_any(lower, cues) {
                out.extend_from_slice(tags);
            }
        }

        if tag == ModuleTag::Customers
            && out.is_empty()
            && contains_any(lower, CUSTOMER_INDIVIDUAL_CUES)
        {
            out.extend_from_slice(CUSTOMER_INDIVIDUAL_TAGS);
        }

        out
    }
}

/// Whether the module form carries data: `Some(true)` when any field is
/// filled in, `Some(false)` for an all-empty form, `None` without a form.
fn form_state(context: &ContextMap) -> Option<bool> {
    let data = module_data(context).filter(|d| !d.is_empty())?;

    Some(
        data.values()
            .filter(|v| is_filled(v))
            .any(|v| !value_text(v).trim().is_empty()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::module_context::resolve;
    use serde_json::{json, Value};

    fn map(value: Value) -> ContextMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn tags_for(question: &str, context: Value) -> Vec<String> {
        let context = map(context);
        TagGenerator::new().generate(question, &context, &resolve(&context))
    }

    #[test]
    fn test_capped_and_unique() {
        let tags = tags_for(
            "Como criar, editar e excluir com erro no cnpj e senha?",
            json!({"type": "Vendas", "data": {"vendaNumero": "1"}}),
        );

        assert_eq!(tags.len(), MAX_TAGS);
        let mut unique = tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
        assert_eq!(tags[0], "tutorial");
        assert!(!tags.contains(&"vendas".to_string()));
    }

    #[test]
    fn test_short_question_without_module_data() {
        // Two question tags plus 12 Carriers tags leave room for one system tag
        let tags = tags_for("frete?", json!({"type": "Transportadoras"}));

        assert_eq!(tags[0], "pergunta_simples");
        assert_eq!(tags[1], "duvida_direta");
        assert!(tags.contains(&"transportadoras".to_string()));
        assert!(tags.contains(&"mock_erp".to_string()));
        assert!(!tags.contains(&"sistema_gestao".to_string()));
        assert_eq!(tags.len(), MAX_TAGS);
    }

    #[test]
    fn test_form_and_length_tags_survive_the_cap() {
        // Arrange
        let context = json!({"type": "Clientes", "data": {"nome": "Acme"}});

        // Act
        let tags = tags_for("onde cadastro o CNPJ?", context);

        // Assert
        for expected in ["edicao", "pessoa_juridica", "pergunta_media", "duvida_direta", "clientes"] {
            assert!(
                tags.contains(&expected.to_string()),
                "Expected {} for 'onde cadastro o CNPJ?'",
                expected
            );
        }
        assert!(tags.len() <= MAX_TAGS);
    }

    #[test]
    fn test_system_tags_fill_remaining_slots() {
        let tags = tags_for("oi", json!({"type": "Transportadoras"}));

        assert_eq!(tags.len(), MAX_TAGS);
        for expected in ["pergunta_simples", "transportadoras", "mock_erp", "sistema_gestao"] {
            assert!(tags.contains(&expected.to_string()), "Expected {} for 'oi'", expected);
        }
    }

    #[test]
    fn test_form_state() {
        assert_eq!(form_state(&map(json!({"data": {"nome": "Acme"}}))), Some(true));
        assert_eq!(form_state(&map(json!({"data": {"nome": "  ", "doc": ""}}))), Some(false));
        assert_eq!(form_state(&map(json!({"data": {}}))), None);
        assert_eq!(form_state(&map(json!({}))), None);
    }

    #[test]
    fn test_conditional_customer_tags() {
        let generator = TagGenerator::new();

        let corporate = generator.conditional_tags("cnpj da empresa", ModuleTag::Customers);
        assert_eq!(corporate, vec!["pessoa_juridica", "corporativo", "b2b"]);

        let individual = generator.conditional_tags("onde vai o cpf", ModuleTag::Customers);
        assert_eq!(individual, vec!["pessoa_fisica", "individual", "b2c"]);

        let both = generator.conditional_tags("cnpj ou cpf", ModuleTag::Customers);
        assert_eq!(both, vec!["pessoa_juridica", "corporativo", "b2b"]);
    }

    #[test]
    fn test_conditional_tags_need_explicit_type() {
        let generator = TagGenerator::new();
        let context = map(json!({"usuarioNome": "ana"}));
        let resolution = resolve(&context);

        let tags = generator.generate("perfil admin", &context, &resolution);
        assert!(!tags.contains(&"admin_rights".to_string()));
    }
}
