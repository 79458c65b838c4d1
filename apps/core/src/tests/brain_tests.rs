//! Brain Module Tests
//!
//! Properties every extractor must hold for any input: bounded output, no
//! duplicates, determinism, first-match category precedence.

use crate::brain::category::CATEGORY_TAXONOMY;
use crate::brain::module_context::{resolve, ContextMap};
use crate::brain::tags::MAX_TAGS;
use crate::brain::{CategoryClassifier, KeywordExtractor, RequestAnalyzer, TagGenerator};
use serde_json::{json, Value};
use std::collections::HashSet;

const QUESTIONS: &[&str] = &[
    "",
    "?",
    "onde cadastro o CNPJ?",
    "Como faço para emitir uma nota fiscal de devolução com CFOP 5202 no valor de R$ 150,00?",
    "O sistema está travando quando tento salvar a venda, aparece um erro estranho e não consigo finalizar o pedido do cliente",
    "preço preço preço custo custo estoque estoque",
    "Obrigado, funcionou perfeitamente!",
    "quero alterar o email e o telefone do usuário admin e também mudar o perfil de acesso dele para gerente regional",
    "Como implementar integração com o banco para conciliação automática de boletos, pix, cartões e transferências?",
    "a o e é de da do em um uma",
    "relatório relatórios dados informações análise gráfico dashboard indicadores exportar imprimir",
];

fn contexts() -> Vec<ContextMap> {
    [
        json!({}),
        json!({"type": "Clientes", "data": {"nome": "Acme", "documento": "12.345.678/0001-90"}}),
        json!({"type": "Vendas", "data": {"vendaCliente": "Acme", "vendaTotal": 150}}),
        json!({"type": "Notas Fiscais", "data": {"nfNumero": "123"}}),
        json!({"type": "Transportadoras", "data": {}}),
        json!({"type": "Usuários", "data": {"usuarioNome": "admin"}}),
        json!({"type": "Empresa"}),
        json!({"name": "Café", "category": "bebidas", "code": "CF-01", "price": 10}),
        json!({"clienteNome": "Beta"}),
        json!({"type": "Desconhecido", "nfSerie": "1"}),
    ]
    .into_iter()
    .map(|value: Value| value.as_object().cloned().unwrap_or_default())
    .collect()
}

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn test_single_category_cue_wins() {
        let classifier = CategoryClassifier::new();

        for (category, cues) in CATEGORY_TAXONOMY {
            for cue in cues.iter() {
                let matched_elsewhere = CATEGORY_TAXONOMY
                    .iter()
                    .filter(|(other, _)| other != category)
                    .any(|(_, other_cues)| other_cues.iter().any(|c| cue.contains(c)));
                if matched_elsewhere {
                    continue;
                }

                assert_eq!(
                    classifier.classify(cue),
                    *category,
                    "Expected {:?} for '{}'",
                    category,
                    cue
                );
            }
        }
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = CategoryClassifier::new();

        for (category, cues) in CATEGORY_TAXONOMY {
            let cue = cues[0];
            assert_eq!(
                classifier.classify(&cue.to_uppercase()),
                classifier.classify(cue),
                "Expected same category for upper-cased '{}' ({:?})",
                cue,
                category
            );
        }
    }
}

#[cfg(test)]
mod keyword_property_tests {
    use super::*;

    #[test]
    fn test_keyword_bounds() {
        let extractor = KeywordExtractor::new();

        for question in QUESTIONS {
            let keywords = extractor.extract(question);
            let unique: HashSet<&String> = keywords.iter().collect();

            assert!(keywords.len() <= 10, "Expected at most 10 keywords for '{}'", question);
            assert_eq!(unique.len(), keywords.len(), "Expected no duplicates for '{}'", question);
            for keyword in &keywords {
                assert!(
                    keyword.chars().count() > 2,
                    "Expected '{}' to be longer than 2 chars",
                    keyword
                );
                assert!(!extractor.is_stopword(keyword), "Expected '{}' not to be a stop word", keyword);
            }
        }
    }
}

#[cfg(test)]
mod tag_property_tests {
    use super::*;

    #[test]
    fn test_tag_bounds() {
        let generator = TagGenerator::new();

        for context in contexts() {
            let module = resolve(&context);
            for question in QUESTIONS {
                let tags = generator.generate(question, &context, &module);
                let unique: HashSet<&String> = tags.iter().collect();

                assert!(tags.len() <= MAX_TAGS, "Expected at most {} tags for '{}'", MAX_TAGS, question);
                assert_eq!(unique.len(), tags.len(), "Expected no duplicate tags for '{}'", question);
            }
        }
    }
}

#[cfg(test)]
mod analyzer_property_tests {
    use super::*;

    #[test]
    fn test_analysis_is_deterministic() {
        let analyzer = RequestAnalyzer::new();

        for context in contexts() {
            for question in QUESTIONS {
                assert_eq!(
                    analyzer.analyze(question, &context),
                    analyzer.analyze(question, &context),
                    "Expected identical analysis for '{}'",
                    question
                );
            }
        }
    }

    #[test]
    fn test_resolution_is_total() {
        for context in contexts() {
            let first = resolve(&context);
            assert_eq!(first, resolve(&context));
        }
    }

    #[test]
    fn test_entity_limits() {
        let analyzer = RequestAnalyzer::new();
        let result = analyzer.analyze("quero 1 2 3 4 5 unidades", &ContextMap::new());

        let numbers: Vec<String> = result
            .entities
            .iter()
            .map(|e| e.to_string())
            .filter(|e| e.starts_with("NUMBER:"))
            .collect();
        assert_eq!(numbers, vec!["NUMBER:1", "NUMBER:2", "NUMBER:3"]);
    }
}
