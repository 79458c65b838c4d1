//! Locally synthesized answers and context descriptions.
//!
//! Used when the assistant service cannot answer (offline processing,
//! rejected or failed dispatches), and to describe the requester's screen to
//! the service.

use super::module_context::{data_field, field_text, ContextMap, ModuleResolution, ModuleTag};

/// Requester name used when the request is anonymous
pub const ANONYMOUS_REQUESTER: &str = "Usuário Anônimo";

/// Answer text used when a request arrives without module or product data
pub const INSUFFICIENT_INPUT_MESSAGE: &str =
    "Por favor, preencha os dados do formulário antes de usar o assistente.";

/// Keyword rules for product questions, checked in order.
const PRODUCT_RULES: &[(&[&str], fn(&str, &str) -> String)] = &[
    (&["preço", "custo"], pricing_answer),
    (&["estoque", "quantidade"], inventory_answer),
    (&["venda", "marketing"], sales_answer),
    (&["fornecedor"], supplier_answer),
    (&["cadastro", "registro"], registration_answer),
];

fn pricing_answer(name: &str, category: &str) -> String {
    format!(
        "Para definir o preço do {name}, considere: custo de produção + margem de lucro desejada + impostos. \
         Para produtos da categoria {category}, sugiro pesquisar preços de concorrentes e aplicar uma margem entre 30-50%."
    )
}

fn inventory_answer(name: &str, category: &str) -> String {
    format!(
        "Para gestão de estoque do {name}, recomendo: monitorar o giro de estoque, definir ponto de reposição \
         e manter estoque de segurança. Produtos da categoria {category} geralmente têm boa rotatividade."
    )
}

fn sales_answer(name: &str, category: &str) -> String {
    format!(
        "Para melhorar as vendas do {name}, sugiro: destacar os benefícios únicos, criar campanhas segmentadas \
         para {category}, e considerar promoções sazonais."
    )
}

fn supplier_answer(name: &str, category: &str) -> String {
    format!(
        "Para encontrar fornecedores do {name}, recomendo: pesquisar no Alibaba, contatar distribuidores locais, \
         e verificar feiras do setor de {category}."
    )
}

fn registration_answer(name: &str, category: &str) -> String {
    format!(
        "Para cadastrar o {name} corretamente: preencha todos os campos obrigatórios, inclua descrição detalhada, \
         defina a categoria como {category}, e adicione fotos de qualidade."
    )
}

fn generic_answer(name: &str, category: &str) -> String {
    format!(
        "Entendi sua dúvida sobre o {name}. Para produtos da categoria {category}, recomendo verificar as melhores \
         práticas do setor e consultar nossa base de conhecimento. Posso ajudar com informações mais específicas \
         se você detalhar sua necessidade."
    )
}

fn module_answer(tag: ModuleTag, context: &ContextMap) -> Option<String> {
    let answer = match tag {
        ModuleTag::Customers => {
            let name = data_field(context, "nome").unwrap_or_else(|| "cliente".to_string());
            let kind = match data_field(context, "tipo").as_deref() {
                Some("pj") => "empresa",
                _ => "pessoa",
            };
            format!(
                "Para cadastrar o CNPJ do {name}, acesse o campo 'Documento' na aba de cadastro de clientes. \
                 Para {kind}s jurídicas, este campo é obrigatório e deve seguir o formato XX.XXX.XXX/XXXX-XX."
            )
        }
        ModuleTag::Sales => "No módulo de vendas, você pode gerenciar pedidos, calcular totais e acompanhar o \
             processo comercial. Use as abas para navegar entre listagem e cadastro de novas vendas."
            .to_string(),
        ModuleTag::Carriers => "No cadastro de transportadoras, você pode gerenciar as empresas responsáveis pelo \
             transporte. Preencha os dados como CNPJ, região de atuação e informações de contato."
            .to_string(),
        ModuleTag::Invoices => "O módulo de notas fiscais permite emitir, consultar e gerenciar documentos fiscais. \
             Você pode acompanhar o status das NFe e realizar cancelamentos quando necessário."
            .to_string(),
        ModuleTag::Users => "Na gestão de usuários, você pode criar novos acessos, definir perfis e permissões. \
             Configure o login, senha e nível de acesso de cada usuário do sistema."
            .to_string(),
        ModuleTag::Company => "Os dados da empresa são fundamentais para o funcionamento do sistema. Mantenha \
             atualizadas as informações de CNPJ, razão social e configurações fiscais."
            .to_string(),
        ModuleTag::Products => return None,
    };
    Some(answer)
}

/// Deterministic answer for a question when the assistant is unavailable.
///
/// Explicitly named modules get their canned guidance; product questions are
/// answered by keyword, falling back to a generic message naming the product.
pub fn fallback_answer(question: &str, context: &ContextMap, module: &ModuleResolution) -> String {
    if module.is_explicit() {
        if let Some(answer) = module_answer(module.tag, context) {
            return answer;
        }
    }

    let name = field_text(context, "name").unwrap_or_else(|| "item".to_string());
    let category =
        field_text(context, "category").unwrap_or_else(|| "categoria não especificada".to_string());
    let lower = question.to_lowercase();

    PRODUCT_RULES
        .iter()
        .find(|(cues, _)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|(_, answer)| answer(&name, &category))
        .unwrap_or_else(|| generic_answer(&name, &category))
}

/// Human-readable description of who is asking and from which screen.
pub fn context_description(
    requester_name: Option<&str>,
    context: &ContextMap,
    module: &ModuleResolution,
) -> String {
    let requester = requester_name.unwrap_or(ANONYMOUS_REQUESTER);

    let highlight = |subject: &str, key: &str, label: &str| {
        let mut description = format!("Usuário {} consultando sobre {}", requester, subject);
        if let Some(value) = data_field(context, key) {
            description.push_str(&format!(" - {}: {}", label, value));
        }
        description
    };

    match (module.is_explicit(), module.tag) {
        (true, ModuleTag::Customers) => highlight("gestão de clientes", "nome", "cliente"),
        (true, ModuleTag::Sales) => highlight("vendas", "vendaCliente", "venda para"),
        (true, ModuleTag::Carriers) => highlight("transportadoras", "transpNome", "transportadora"),
        (true, ModuleTag::Invoices) => highlight("notas fiscais", "nfNumero", "NF"),
        (true, ModuleTag::Users) => highlight("gestão de usuários", "usuarioNome", "usuário"),
        (true, ModuleTag::Company) => highlight("dados da empresa", "empresaNome", "empresa"),
        _ => format!(
            "Usuário {} consultando sobre produto {} da categoria {}",
            requester,
            field_text(context, "name").unwrap_or_else(|| "N/A".to_string()),
            field_text(context, "category").unwrap_or_else(|| "N/A".to_string()),
        ),
    }
}
