//! Demo data loaded at startup.

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{
    Collaborator, OrderDraft, OrderSignature, OrderTemplate, ServiceOrder,
};

use crate::store::{Store, StoreState};

/// Units offered when none are configured.
pub const DEFAULT_UNITS: [&str; 8] = [
    "Rio Centro",
    "Barra da Tijuca",
    "Copacabana",
    "Ipanema",
    "Tijuca",
    "Vila Isabel",
    "Méier",
    "Campo Grande",
];

const COLLABORATORS: [(&str, &str, &str, &str); 15] = [
    ("João da Silva", "123.456.789-00", "Auxiliar Administrativo", "Rio Centro"),
    ("Maria Souza", "987.654.321-00", "Técnica de Enfermagem", "Barra da Tijuca"),
    ("Carlos Pereira", "456.789.123-00", "Analista de Sistemas", "Copacabana"),
    ("Ana Paula", "654.321.987-00", "Gerente de Projetos", "Ipanema"),
    ("Pedro Alves", "321.654.987-00", "Consultor Financeiro", "Tijuca"),
    ("João Silva", "123.456.789-01", "Técnico de Segurança", "Rio Centro"),
    ("Maria Santos", "987.654.321-01", "Operadora de Máquinas", "Barra da Tijuca"),
    ("Pedro Oliveira", "111.222.333-44", "Soldador", "Copacabana"),
    ("Ana Costa", "555.666.777-88", "Técnica em Eletrônica", "Ipanema"),
    ("Carlos Mendes", "999.888.777-66", "Operador de Empilhadeira", "Tijuca"),
    ("Lucia Ferreira", "222.333.444-55", "Auxiliar de Produção", "Rio Centro"),
    ("Roberto Alves", "444.555.666-77", "Mecânico Industrial", "Barra da Tijuca"),
    ("Fernanda Lima", "666.777.888-99", "Técnica de Qualidade", "Copacabana"),
    ("José Rodrigues", "333.444.555-66", "Eletricista", "Ipanema"),
    ("Patricia Sousa", "777.888.999-00", "Supervisora de Produção", "Tijuca"),
];

impl Store {
    /// A store holding the demo orders, template and collaborator directory.
    pub fn seeded(units: Vec<String>) -> Self {
        let mut state = StoreState {
            units,
            ..Default::default()
        };
        seed(&mut state);
        Self::from_state(state)
    }
}

/// Loads the demo data into an existing state.
pub fn seed(state: &mut StoreState) {
    state.collaborators.extend(
        COLLABORATORS
            .iter()
            .map(|(name, cpf, role, unit)| Collaborator::new(*name, cpf, *role, *unit)),
    );

    let created = at(2024, 5, 30);
    if let Ok(template) = OrderTemplate::new(
        "Rio Centro".to_string(),
        "Modelo Padrão - Rio Centro".to_string(),
        None,
        created,
    ) {
        state.templates.push(template);
    }

    state.orders.push(ServiceOrder::new(
        "0001".to_string(),
        OrderDraft {
            company: "Empresa A Ltda".into(),
            unit: "Rio Centro".into(),
            collaborator: "João Silva".into(),
            cpf: "123.456.789-00".into(),
            role: "Técnico de Segurança".into(),
            risks: "Trabalho em altura, exposição a ruído, manuseio de equipamentos".into(),
            ppe: "Capacete, óculos de proteção, luvas, calçado de segurança, protetor auricular".into(),
            obligations: "Utilizar EPIs obrigatórios, seguir procedimentos de segurança, reportar incidentes".into(),
            prohibitions: "Não utilizar equipamentos sem treinamento, não remover proteções de segurança".into(),
            penalties: "Advertência verbal, advertência escrita, suspensão, demissão por justa causa".into(),
            acknowledgment: "Declaro ter recebido e compreendido todas as orientações de segurança".into(),
            accident_procedure: "Comunicar imediatamente o supervisor, buscar atendimento médico se necessário".into(),
            issue_date: Some(created.date_naive()),
        },
        created,
    ));

    let signed_day = at(2024, 5, 29);
    let mut signed = ServiceOrder::new(
        "0002".to_string(),
        OrderDraft {
            company: "Empresa B Ltda".into(),
            unit: "Barra da Tijuca".into(),
            collaborator: "Maria Santos".into(),
            cpf: "987.654.321-00".into(),
            role: "Operadora de Máquinas".into(),
            risks: "Operação de equipamentos pesados, ruído industrial".into(),
            ppe: "Capacete, protetor auricular, luvas de segurança, calçado de segurança".into(),
            obligations: "Seguir procedimentos operacionais, manter equipamentos limpos".into(),
            prohibitions: "Não operar equipamentos sob efeito de substâncias, não burlar proteções".into(),
            penalties: "Advertência, suspensão, demissão por justa causa conforme gravidade".into(),
            acknowledgment: "Confirmo o recebimento e entendimento das normas de segurança".into(),
            accident_procedure: "Parar atividades, comunicar supervisor, procurar atendimento médico".into(),
            issue_date: Some(signed_day.date_naive()),
        },
        signed_day,
    );
    // freshly created, so never already signed
    let _ = signed.sign(OrderSignature {
        signer: "Maria Santos".into(),
        signed_at: signed_day,
        image: None,
    });
    state.orders.push(signed);

    tracing::debug!(
        orders = state.orders.len(),
        templates = state.templates.len(),
        collaborators = state.collaborators.len(),
        "Seeded demo data"
    );
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .map(|datetime| datetime.and_utc())
        .unwrap_or_else(Utc::now)
}
