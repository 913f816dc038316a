use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::domain::Category;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid {field} pattern `{pattern}` for {label}: {source}")]
    Invalid {
        label: String,
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("{0} is checked through spam signatures and cannot carry field rules")]
    Reserved(Category),
    #[error("{0} appears more than once in the scoring order")]
    Duplicate(Category),
}

/// Uncompiled rule table for one category.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<'a> {
    pub category: Category,
    pub senders: &'a [&'a str],
    pub subjects: &'a [&'a str],
    pub content: &'a [&'a str],
}

#[derive(Debug, Default)]
pub struct ClassificationPattern {
    pub senders: Vec<Regex>,
    pub subjects: Vec<Regex>,
    pub content: Vec<Regex>,
}

#[derive(Debug)]
pub struct PatternLibrary {
    order: Vec<(Category, ClassificationPattern)>,
    spam: Vec<Regex>,
}

impl PatternLibrary {
    /// Compiles rule tables; their slice order becomes the scoring order.
    pub fn from_rules(rules: &[RuleTable<'_>], spam: &[&str]) -> Result<Self, PatternError> {
        let mut order: Vec<(Category, ClassificationPattern)> = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.category == Category::Spam {
                return Err(PatternError::Reserved(Category::Spam));
            }
            if order.iter().any(|(seen, _)| *seen == rule.category) {
                return Err(PatternError::Duplicate(rule.category));
            }
            let label = rule.category.as_str();
            let pattern = ClassificationPattern {
                senders: compile_all(label, "sender", rule.senders, false)?,
                subjects: compile_all(label, "subject", rule.subjects, false)?,
                content: compile_all(label, "content", rule.content, false)?,
            };
            order.push((rule.category, pattern));
        }

        Ok(Self {
            order,
            spam: compile_all("spam", "signature", spam, true)?,
        })
    }

    pub fn builtin() -> Result<Self, PatternError> {
        Self::from_rules(BUILTIN_RULES, SPAM_SIGNATURES)
    }

    pub fn patterns(&self, category: Category) -> Option<&ClassificationPattern> {
        self.order
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map(|(_, pattern)| pattern)
    }

    pub fn scoring_order(&self) -> impl Iterator<Item = (Category, &ClassificationPattern)> + '_ {
        self.order.iter().map(|(category, pattern)| (*category, pattern))
    }

    pub fn spam_signatures(&self) -> &[Regex] {
        &self.spam
    }
}

fn compile_all(
    label: &str,
    field: &'static str,
    sources: &[&str],
    span_lines: bool,
) -> Result<Vec<Regex>, PatternError> {
    sources
        .iter()
        .map(|source| {
            RegexBuilder::new(source)
                .case_insensitive(true)
                .unicode(true)
                .dot_matches_new_line(span_lines)
                .build()
                .map_err(|source_err| PatternError::Invalid {
                    label: label.to_string(),
                    field,
                    pattern: (*source).to_string(),
                    source: source_err,
                })
        })
        .collect()
}

static BUILTIN: OnceCell<PatternLibrary> = OnceCell::new();

/// Compiles the built-in library; call once at startup so bad data fails loudly.
pub fn warm_up() -> Result<&'static PatternLibrary, PatternError> {
    let library = BUILTIN.get_or_try_init(PatternLibrary::builtin)?;
    tracing::debug!(
        target: "classifier",
        categories = library.order.len(),
        spam_signatures = library.spam.len(),
        "pattern library compiled"
    );
    Ok(library)
}

pub fn builtin() -> &'static PatternLibrary {
    BUILTIN.get_or_init(|| PatternLibrary::builtin().expect("built-in pattern library compiles"))
}

// Declaration order is the scoring order: the first category to reach the
// threshold wins, so moving a row changes results for borderline mail.
const BUILTIN_RULES: &[RuleTable<'static>] = &[
    RuleTable {
        category: Category::Work,
        senders: &[
            r"@(company|empresa|corp)\.",
            r"@[a-z0-9.-]+\.(corp|internal)$",
            r"^(hr|rh|recruiting|jira|confluence)@",
            r"@(slack|atlassian|asana|trello)\.com$",
        ],
        subjects: &[
            r"\b(meeting|reunião|reuniao)\b",
            r"\b(project|projeto)\b",
            r"\b(deadline|prazo)\b",
            r"\b(report|relatório|relatorio)\b",
            r"\b(sprint|standup|stand-up)\b",
            r"\b(proposal|proposta)\b",
            r"\bq[1-4]\b",
        ],
        content: &[
            r"\b(meeting|reunião|reuniao)\b",
            r"\b(project|projeto)\b",
            r"\b(deadline|prazo)\b",
            r"\b(team|equipe)\b",
            r"\b(client|cliente)\b",
            r"\b(agenda|pauta)\b",
        ],
    },
    RuleTable {
        category: Category::Personal,
        senders: &[r"@(gmail|hotmail|outlook|yahoo|icloud|live|uol|bol)\.(com|com\.br)$"],
        subjects: &[
            r"\b(family|família|familia)\b",
            r"\b(birthday|aniversário|aniversario)\b",
            r"\b(dinner|jantar|almoço|almoco)\b",
            r"\b(weekend|fim de semana)\b",
            r"\b(photos|fotos)\b",
            r"\b(mom|dad|mãe|mae|pai)\b",
        ],
        content: &[
            r"\b(love|amor)\b",
            r"\b(miss you|saudades)\b",
            r"\b(hugs|abraços|abracos|beijos)\b",
            r"\b(family|família|familia)\b",
        ],
    },
    RuleTable {
        category: Category::Promotions,
        senders: &[
            r"^(promo|promocoes|promoções|marketing|deals|offers|ofertas)@",
            r"@(mailchimp|sendgrid|klaviyo)\.",
        ],
        subjects: &[
            r"\d{1,2}\s?%\s?(off|de desconto)",
            r"\b(sale|liquidação|liquidacao|promoção|promocao)\b",
            r"\b(discount|desconto)\b",
            r"\b(deals?|ofertas?)\b",
            r"\b(coupon|cupom)\b",
            r"\b(limited time|por tempo limitado)\b",
            r"\bblack friday\b",
        ],
        content: &[
            r"\b(discount|desconto)\b",
            r"\b(coupon|cupom|promo code)\b",
            r"\b(shop now|compre agora)\b",
            r"\b(free shipping|frete grátis|frete gratis)\b",
            r"\b(unsubscribe|descadastrar)\b",
        ],
    },
    RuleTable {
        category: Category::Urgent,
        senders: &[r"^(urgent|urgente)@"],
        subjects: &[
            r"\b(urgent|urgente)\b",
            r"\basap\b",
            r"\b(immediately|imediatamente)\b",
            r"\b(action required|ação necessária|acao necessaria)\b",
            r"\b(important|importante)\b",
            r"\b(final notice|último aviso|ultimo aviso)\b",
            r"🚨|⚠️",
        ],
        content: &[
            r"\b(urgent|urgente)\b",
            r"\b(as soon as possible|o quanto antes)\b",
            r"\b(immediately|imediatamente)\b",
            r"\b(respond today|responda hoje)\b",
        ],
    },
    RuleTable {
        category: Category::Bills,
        senders: &[
            r"^(billing|faturamento|cobranca|cobrança|invoices?|faturas?|payments?|pagamentos?)@",
            r"@([a-z0-9-]+\.)*(bank|banco|nubank|itau|bradesco|santander)\.",
        ],
        subjects: &[
            r"\b(invoice|fatura)\b",
            r"\b(bill|conta de (luz|água|agua|gás|gas|telefone|internet))\b",
            r"\b(payment|pagamento)\b",
            r"\b(due|vencimento|vence)\b",
            r"\b(statement|extrato)\b",
            r"\bboleto\b",
            r"\b(receipt|recibo)\b",
        ],
        content: &[
            r"\b(amount due|valor devido|valor a pagar)\b",
            r"\b(due date|data de vencimento)\b",
            r"\b(pay now|pague agora)\b",
            r"\b(balance|saldo)\b",
            r"(\$|r\$|€)\s?\d",
        ],
    },
    RuleTable {
        category: Category::Social,
        senders: &[
            r"@(facebook|facebookmail|instagram|twitter|x|linkedin|tiktok|pinterest|reddit|discord)\.com$",
            r"@([a-z0-9-]+\.)*(whatsapp|snapchat)\.",
        ],
        subjects: &[
            r"\b(friend request|pedido de amizade|solicitação de amizade)\b",
            r"\b(tagged you|marcou você|marcou voce)\b",
            r"\b(commented|comentou)\b",
            r"\b(liked|curtiu)\b",
            r"\b(mentioned you|mencionou você|mencionou voce)\b",
            r"\b(new follower|novo seguidor|started following|começou a seguir)\b",
        ],
        content: &[
            r"\b(followers|seguidores)\b",
            r"\b(your post|sua publicação|seu post)\b",
            r"\b(profile|perfil)\b",
            r"\b(notification|notificação|notificacao)\b",
        ],
    },
    RuleTable {
        category: Category::Newsletters,
        senders: &[
            r"^(newsletter|news|digest|weekly|boletim)@",
            r"@(substack|medium|beehiiv|buttondown)\.",
        ],
        subjects: &[
            r"\b(newsletter|boletim)\b",
            r"\b(weekly|semanal|monthly|mensal)\b",
            r"\b(digest|resumo)\b",
            r"\b(issue|edition|edição|edicao)\s?#?\d+",
            r"\b(this week in|esta semana)\b",
        ],
        content: &[
            r"\b(unsubscribe|cancelar inscrição|descadastre)\b",
            r"\b(read more|leia mais)\b",
            r"\b(in this issue|nesta edição)\b",
            r"\b(subscribers|assinantes)\b",
        ],
    },
    RuleTable {
        category: Category::Travel,
        senders: &[
            r"@(booking|airbnb|expedia|decolar|latam|voegol|voeazul|united|delta|tripadvisor|kayak)\.",
        ],
        subjects: &[
            r"\b(flight|voo|vôo)\b",
            r"\b(booking|reserva)\b",
            r"\b(hotel|pousada)\b",
            r"\b(itinerary|itinerário|itinerario)\b",
            r"\b(boarding pass|cartão de embarque|check-in)\b",
            r"\b(trip|viagem)\b",
        ],
        content: &[
            r"\b(flight|voo|vôo)\b",
            r"\b(departure|partida|embarque)\b",
            r"\b(arrival|chegada)\b",
            r"\b(passport|passaporte)\b",
            r"\b(gate|portão)\b",
            r"\b(reservation|reserva)\b",
        ],
    },
    RuleTable {
        category: Category::Shopping,
        senders: &[
            r"@(amazon|mercadolivre|mercadolibre|shopee|aliexpress|magazineluiza|magalu|americanas|ebay|etsy)\.",
            r"^(orders?|pedidos?|shipping|envios?)@",
        ],
        subjects: &[
            r"\b(order|pedido)\b",
            r"\b(shipped|enviado|despachado)\b",
            r"\b(delivery|entrega)\b",
            r"\b(tracking|rastreamento|rastreio)\b",
            r"\b(purchase|compra)\b",
        ],
        content: &[
            r"\b(order number|número do pedido|numero do pedido)\b",
            r"\b(tracking number|código de rastreio|codigo de rastreio)\b",
            r"\b(cart|carrinho)\b",
            r"\b(shipping address|endereço de entrega)\b",
        ],
    },
    RuleTable {
        category: Category::Security,
        senders: &[
            r"^(security|seguranca|segurança|account-security)@",
            r"@accounts\.google\.com$",
        ],
        subjects: &[
            r"\b(security alert|alerta de segurança|alerta de seguranca)\b",
            r"\b(password|senha)\b",
            r"\b(verification code|código de verificação|codigo de verificacao)\b",
            r"\b(new (sign-in|login)|novo (acesso|login))\b",
            r"\b(two-factor|2fa|autenticação em dois fatores)\b",
            r"\b(suspicious|suspeita|suspeito)\b",
        ],
        content: &[
            r"\b(password|senha)\b",
            r"\b(verify|verifique|verificar)\b",
            r"\b(login|sign-in|acesso)\b",
            r"\b(ip address|endereço ip)\b",
            r"\b(device|dispositivo)\b",
        ],
    },
    RuleTable {
        category: Category::General,
        senders: &[],
        subjects: &[],
        content: &[],
    },
];

const SPAM_SIGNATURES: &[&str] = &[
    r"\b(you'?ve won|you have won|você ganhou|voce ganhou)\b",
    r"\bcongratulations\b.*\b(winner|prize|selected|lottery)\b",
    r"\b(congratulations|parabéns|parabens)\b.*\b(million|milhão|milhao|milhões|milhoes)\b",
    r"\b(lottery|loteria)\b",
    r"\b(free money|dinheiro grátis|dinheiro gratis)\b",
    r"\b(claim your (prize|reward)|resgate seu prêmio|resgate seu premio)\b",
    r"\$\s?\d{1,3}(,\d{3}){2,}",
    r"\b\d+\s?million (dollars|usd)\b|\bmilhões de (reais|dólares)\b",
    r"\b(nigerian prince|inheritance transfer|herança milionária)\b",
    r"\b(act now|aja agora)\b.*\b(limited|limitado)\b",
    r"\b(viagra|cialis|casino|cassino)\b",
    r"\b(wire transfer|bank details|dados bancários)\b.*\b(confidential|confidencial)\b",
    r"100% (free|grátis|gratis)\b",
    r"\b(work from home|trabalhe em casa)\b.*\$\s?\d",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_library_compiles() {
        let library = PatternLibrary::builtin().unwrap();
        assert_eq!(library.scoring_order().count(), 11);
        assert!(!library.spam_signatures().is_empty());
    }

    #[test]
    fn scoring_order_follows_declaration() {
        let order: Vec<Category> = builtin().scoring_order().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                Category::Work,
                Category::Personal,
                Category::Promotions,
                Category::Urgent,
                Category::Bills,
                Category::Social,
                Category::Newsletters,
                Category::Travel,
                Category::Shopping,
                Category::Security,
                Category::General,
            ]
        );
    }

    #[test]
    fn every_non_spam_category_has_a_table() {
        let library = builtin();
        for category in Category::ALL {
            let found = library.patterns(category).is_some();
            assert_eq!(found, category != Category::Spam, "{category}");
        }
        assert!(library.patterns(Category::General).unwrap().senders.is_empty());
    }

    #[test]
    fn matching_ignores_case_and_accents_stay_literal() {
        let library = builtin();
        let bills = library.patterns(Category::Bills).unwrap();
        assert!(bills.subjects.iter().any(|re| re.is_match("SUA FATURA CHEGOU")));
        let travel = library.patterns(Category::Travel).unwrap();
        assert!(travel.subjects.iter().any(|re| re.is_match("Seu VÔO foi confirmado")));
    }

    #[test]
    fn rejects_malformed_literal() {
        let rules = [RuleTable {
            category: Category::Work,
            senders: &[],
            subjects: &["(unclosed"],
            content: &[],
        }];
        let err = PatternLibrary::from_rules(&rules, &[]).unwrap_err();
        assert!(matches!(err, PatternError::Invalid { field: "subject", .. }));
    }

    #[test]
    fn rejects_spam_rows_and_duplicates() {
        let spam = [RuleTable {
            category: Category::Spam,
            senders: &[],
            subjects: &[],
            content: &[],
        }];
        assert!(matches!(
            PatternLibrary::from_rules(&spam, &[]),
            Err(PatternError::Reserved(Category::Spam))
        ));

        let work = RuleTable {
            category: Category::Work,
            senders: &[],
            subjects: &[],
            content: &[],
        };
        assert!(matches!(
            PatternLibrary::from_rules(&[work, work], &[]),
            Err(PatternError::Duplicate(Category::Work))
        ));
    }
}
