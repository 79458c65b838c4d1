//! Category and subcategory detection.
//!
//! Lexical classification of ERP questions. Each category owns a list of
//! Portuguese cue phrases; the first category (in declaration order) with a
//! cue contained in the lower-cased question wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::module_context::{ModuleResolution, ResolvedBy};

/// Detected request category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Where is a field / button / screen
    UserInterface,
    /// Creating new records
    DataEntry,
    /// Changing existing records
    DataEdit,
    /// Finding and listing records
    DataSearch,
    /// Removing records
    DataDelete,
    /// Business flows and procedures
    BusinessProcess,
    /// Reports, exports, dashboards
    Reporting,
    /// Invoices, taxes, SEFAZ
    FiscalTax,
    /// Prices, payments, totals
    Financial,
    /// Stock and items
    Inventory,
    /// Customers and contacts
    CustomerManagement,
    /// Orders, quotes, commissions
    Sales,
    /// Users, logins, permissions
    UserAccess,
    /// System parameters and integrations
    SystemConfig,
    /// Errors and malfunctions
    ErrorTroubleshooting,
    /// How-to and explanations
    TutorialHelp,
    /// Nothing more specific matched
    GeneralInquiry,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Category {
    /// Wire label of the category
    pub fn label(&self) -> &'static str {
        match self {
            Category::UserInterface => "user_interface",
            Category::DataEntry => "data_entry",
            Category::DataEdit => "data_edit",
            Category::DataSearch => "data_search",
            Category::DataDelete => "data_delete",
            Category::BusinessProcess => "business_process",
            Category::Reporting => "reporting",
            Category::FiscalTax => "fiscal_tax",
            Category::Financial => "financial",
            Category::Inventory => "inventory",
            Category::CustomerManagement => "customer_management",
            Category::Sales => "sales",
            Category::UserAccess => "user_access",
            Category::SystemConfig => "system_config",
            Category::ErrorTroubleshooting => "error_troubleshooting",
            Category::TutorialHelp => "tutorial_help",
            Category::GeneralInquiry => "general_inquiry",
        }
    }
}

/// Category taxonomy. Order is precedence: first match wins.
pub const CATEGORY_TAXONOMY: &[(Category, &[&str])] = &[
    (
        Category::UserInterface,
        &[
            "onde", "como encontrar", "como acessar", "onde fica", "onde está",
            "botão", "campo", "formulário", "aba", "tela", "menu", "interface",
        ],
    ),
    (
        Category::DataEntry,
        &[
            "como inserir", "como adicionar", "como preencher", "cadastrar",
            "criar", "novo", "inserir", "adicionar", "registrar", "incluir",
        ],
    ),
    (
        Category::DataEdit,
        &[
            "como alterar", "como editar", "como modificar", "atualizar",
            "mudar", "corrigir", "editar", "modificar", "alterar",
        ],
    ),
    (
        Category::DataSearch,
        &[
            "como buscar", "como encontrar", "como localizar", "procurar",
            "pesquisar", "consultar", "visualizar", "listar", "ver",
        ],
    ),
    (
        Category::DataDelete,
        &[
            "como excluir", "como apagar", "como remover", "deletar",
            "excluir", "apagar", "remover", "eliminar",
        ],
    ),
    (
        Category::BusinessProcess,
        &[
            "processo", "fluxo", "workflow", "etapa", "procedimento",
            "como fazer", "passos", "sequência", "operação",
        ],
    ),
    (
        Category::Reporting,
        &[
            "relatório", "relatórios", "dados", "informações", "análise",
            "dashboard", "gráfico", "exportar", "imprimir",
        ],
    ),
    (
        Category::FiscalTax,
        &[
            "nota fiscal", "nfe", "nfce", "nfse", "imposto", "tributo",
            "fiscal", "sefaz", "xml", "chave", "cancelar", "inutilizar",
        ],
    ),
    (
        Category::Financial,
        &[
            "preço", "valor", "custo", "dinheiro", "pagamento", "cobrança",
            "faturamento", "financeiro", "total", "cálculo", "desconto",
        ],
    ),
    (
        Category::Inventory,
        &[
            "estoque", "quantidade", "produto", "item", "inventário",
            "disponível", "saldo", "movimentação", "entrada", "saída",
        ],
    ),
    (
        Category::CustomerManagement,
        &[
            "cliente", "clientes", "contato", "relacionamento", "crm",
            "pessoa", "empresa", "cnpj", "cpf", "endereço",
        ],
    ),
    (
        Category::Sales,
        &[
            "venda", "vendas", "pedido", "orçamento", "proposta",
            "vendedor", "comissão", "meta", "pipeline",
        ],
    ),
    (
        Category::UserAccess,
        &[
            "usuário", "login", "senha", "acesso", "permissão", "perfil",
            "bloqueado", "ativo", "administrador", "segurança",
        ],
    ),
    (
        Category::SystemConfig,
        &[
            "configuração", "parâmetro", "setting", "empresa", "dados",
            "sistema", "backup", "integração", "api",
        ],
    ),
    (
        Category::ErrorTroubleshooting,
        &[
            "erro", "problema", "bug", "falha", "não funciona", "quebrado",
            "travou", "lento", "não carrega", "deu pau",
        ],
    ),
    (
        Category::TutorialHelp,
        &[
            "como", "tutorial", "ajuda", "explicar", "ensinar", "mostrar",
            "exemplo", "dica", "orientação", "instrução",
        ],
    ),
];

const FIELD_LOCATION_CUES: &[&str] = &["onde", "qual campo", "que campo"];
const HOW_TO_CUES: &[&str] = &["como fazer", "como"];

/// Field cues used to refine interface questions, in priority order.
const FIELD_CUES: &[(&str, &[&str])] = &[
    ("documento", &["cnpj", "documento"]),
    ("email", &["email", "e-mail"]),
    ("telefone", &["telefone", "fone"]),
    ("endereco", &["endereco", "endereço"]),
];

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Category classifier backed by the fixed taxonomy
pub struct CategoryClassifier {
    taxonomy: &'static [(Category, &'static [&'static str])],
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier {
    /// Create a classifier over the built-in taxonomy
    pub fn new() -> Self {
        Self {
            taxonomy: CATEGORY_TAXONOMY,
        }
    }

    /// Classify a question into a category
    pub fn classify(&self, question: &str) -> Category {
        let lower = question.to_lowercase();

        for (category, cues) in self.taxonomy {
            if contains_any(&lower, cues) {
                return *category;
            }
        }

        // Only reachable for questions without any taxonomy cue.
        if question.contains('?') {
            if contains_any(&lower, FIELD_LOCATION_CUES) {
                return Category::UserInterface;
            }
            if contains_any(&lower, HOW_TO_CUES) {
                return Category::TutorialHelp;
            }
        }

        Category::GeneralInquiry
    }

    /// Module-qualified subcategory for an already classified question.
    pub fn subcategory(
        &self,
        category: Category,
        question: &str,
        module: &ModuleResolution,
    ) -> String {
        let suffix = module.tag.slug();

        if module.is_explicit() {
            let lower = question.to_lowercase();
            match category {
                Category::UserInterface => {
                    let field = FIELD_CUES
                        .iter()
                        .find(|(_, cues)| contains_any(&lower, cues))
                        .map(|(field, _)| *field);
                    return match field {
                        Some(field) => format!("field_location_{}_{}", suffix, field),
                        None => format!("interface_navigation_{}", suffix),
                    };
                }
                Category::DataEntry => return format!("create_new_{}", suffix),
                Category::DataEdit => return format!("edit_existing_{}", suffix),
                Category::BusinessProcess => {
                    return if suffix.contains("venda") {
                        "sales_process_flow".to_string()
                    } else if suffix.contains("fiscal") {
                        // "notas_fiscais" has no "fiscal" run, so no built-in slug lands here.
                        "fiscal_process_flow".to_string()
                    } else if suffix.contains("cliente") {
                        "customer_process_flow".to_string()
                    } else {
                        format!("process_{}", suffix)
                    };
                }
                _ => {}
            }
        }

        match module.resolved_by {
            ResolvedBy::Default => format!("{}_general", category.label()),
            _ => format!("{}_{}", category.label(), suffix),
        }
    }
}
