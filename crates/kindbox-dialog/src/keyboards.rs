// Archivo: keyboards.rs
// Propósito: etiquetas de los botones y su interpretación. Cada pregunta de
// opción cerrada tiene un enum; el texto recibido se traduce con una
// búsqueda exacta (sensible a mayúsculas) en su conjunto de etiquetas.
use crate::transport::ChoiceSet;
use kindbox_domain::Municipality;

pub const YES: &str = "Да";
pub const NO: &str = "Нет";

pub const FROM_SELF: &str = "От своего";
pub const FROM_ORGANIZATION: &str = "От имени организации";

pub const CHOOSE_RECIPIENTS: &str = "Выбрать людей";
pub const REJECT_PARTICIPATION: &str = "Отказаться от участия";
pub const GIFTS_INFO: &str = "Как и куда нести подарки?";

/// Respuesta a una pregunta sí/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
  Accepted,
  Rejected,
  Invalid,
}

impl Confirmation {
  pub fn from_label(text: &str) -> Self {
    match text {
      YES => Confirmation::Accepted,
      NO => Confirmation::Rejected,
      _ => Confirmation::Invalid,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfOrOrg {
  FromSelf,
  FromOrganization,
}

impl SelfOrOrg {
  pub fn from_label(text: &str) -> Option<Self> {
    match text {
      FROM_SELF => Some(SelfOrOrg::FromSelf),
      FROM_ORGANIZATION => Some(SelfOrOrg::FromOrganization),
      _ => None,
    }
  }
}

/// Opciones del menú principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeChoice {
  ChooseRecipients,
  RejectParticipation,
  GiftsInfo,
}

impl HomeChoice {
  pub fn from_label(text: &str) -> Option<Self> {
    match text {
      CHOOSE_RECIPIENTS => Some(HomeChoice::ChooseRecipients),
      REJECT_PARTICIPATION => Some(HomeChoice::RejectParticipation),
      GIFTS_INFO => Some(HomeChoice::GiftsInfo),
      _ => None,
    }
  }
}

pub fn yes_no_keyboard() -> ChoiceSet {
  ChoiceSet::single_row(&[YES, NO])
}

pub fn self_or_org_keyboard() -> ChoiceSet {
  ChoiceSet::single_row(&[FROM_SELF, FROM_ORGANIZATION])
}

/// Menú de un donante sin destinatarios elegidos.
pub fn home_keyboard() -> ChoiceSet {
  ChoiceSet::new(vec![vec![CHOOSE_RECIPIENTS.to_string()],
                      vec![REJECT_PARTICIPATION.to_string()]])
}

/// Nombres de las localidades, dos por fila, en el orden recibido.
pub fn municipalities_keyboard(municipalities: &[Municipality]) -> ChoiceSet {
  let rows = municipalities.chunks(2)
                           .map(|pair| pair.iter().map(|m| m.name().to_string()).collect())
                           .collect();
  ChoiceSet::new(rows)
}
