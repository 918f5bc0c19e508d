// Archivo: domain.rs
// Propósito: tipos de valor de la conversación: identidad del actor,
// namespaces de flujo, etiquetas de estado, datos acumulados y el evento
// entrante que consume el router.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::fmt;

/// Identificador del usuario en el transporte.
pub type ActorId = i64;

/// Namespace que separa máquinas de estado independientes sobre el mismo
/// actor (flujo de usuario, flujo administrativo, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowNamespace(Cow<'static, str>);

impl FlowNamespace {
    /// Flujos orientados al usuario (registro, home).
    pub const USER: FlowNamespace = FlowNamespace(Cow::Borrowed("user"));
    /// Reservado para flujos administrativos.
    pub const ADMIN: FlowNamespace = FlowNamespace(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FlowNamespace {
    fn default() -> Self {
        Self::USER
    }
}

impl fmt::Display for FlowNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Etiqueta opaca de estado. Las etiquetas de un flujo se escriben como
/// `flujo.estado` (`registration.set_phone_number`); `NO_STATE` pertenece a
/// todos los flujos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTag(Cow<'static, str>);

impl StateTag {
    /// Estado por defecto de cualquier contexto sin registro persistido.
    pub const NO_STATE: StateTag = StateTag(Cow::Borrowed("no_state"));

    /// Constructor `const` para declarar los estados de un flujo.
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Reconstruye una etiqueta leída desde almacenamiento.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Flujo al que pertenece la etiqueta (`None` para `NO_STATE` o
    /// etiquetas sin prefijo).
    pub fn flow(&self) -> Option<&str> {
        if self.is_no_state() {
            return None;
        }
        self.0.split_once('.').map(|(flow, _)| flow)
    }

    pub fn is_no_state(&self) -> bool {
        *self == Self::NO_STATE
    }
}

impl Default for StateTag {
    fn default() -> Self {
        Self::NO_STATE
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifica de quién es la conversación: `(actor, namespace)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorContext {
    pub actor_id: ActorId,
    pub namespace: FlowNamespace,
}

impl ActorContext {
    pub fn new(actor_id: ActorId, namespace: FlowNamespace) -> Self {
        Self { actor_id, namespace }
    }

    /// Contexto del flujo de usuario.
    pub fn user(actor_id: ActorId) -> Self {
        Self::new(actor_id, FlowNamespace::USER)
    }
}

impl fmt::Display for ActorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.actor_id)
    }
}

/// Cambio parcial sobre los datos acumulados. Una clave con `null` borra la
/// clave; las claves ausentes no se tocan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPatch(IndexMap<String, JsonValue>);

impl DataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asigna `key = value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Marca `key` para borrado explícito.
    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), JsonValue::Null);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }
}

/// Datos acumulados de la conversación, en orden de inserción.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateData(IndexMap<String, JsonValue>);

impl StateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aplica un `DataPatch` respetando la semántica de `merge_data`.
    pub fn apply(&mut self, patch: &DataPatch) {
        for (key, value) in patch.iter() {
            if value.is_null() {
                self.0.shift_remove(key);
            } else {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Valor de texto de `key`; `None` si falta o no es texto.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(JsonValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Registro completo de un contexto: etiqueta + datos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub state: StateTag,
    pub data: StateData,
}

/// Datos de perfil que el transporte adjunta a un evento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(),
               last_name: last_name.into() }
    }

    /// Nombre para mostrar: `nombre apellido`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Evento entrante tal como lo entrega el transporte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub actor_id: ActorId,
    #[serde(default)]
    pub namespace: FlowNamespace,
    pub text: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl InboundEvent {
    /// Evento de texto en el namespace de usuario.
    pub fn text(actor_id: ActorId, text: impl Into<String>) -> Self {
        Self { actor_id,
               namespace: FlowNamespace::USER,
               text: text.into(),
               profile: None }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn in_namespace(mut self, namespace: FlowNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn context(&self) -> ActorContext {
        ActorContext::new(self.actor_id, self.namespace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_tag_flow_prefix() {
        assert_eq!(StateTag::from_static("registration.set_phone_number").flow(), Some("registration"));
        assert_eq!(StateTag::new("home.home").flow(), Some("home"));
        assert_eq!(StateTag::NO_STATE.flow(), None);
        assert!(StateTag::new("no_state").is_no_state());
    }

    #[test]
    fn owned_and_static_tags_compare_equal() {
        assert_eq!(StateTag::new("registration.x"), StateTag::from_static("registration.x"));
        assert_eq!(FlowNamespace::new("user"), FlowNamespace::USER);
    }

    #[test]
    fn apply_patch_sets_and_clears() {
        let mut data = StateData::new();
        data.apply(&DataPatch::new().set("a", "1").set("b", json!(2)));
        data.apply(&DataPatch::new().clear("a").set("c", true));
        assert!(!data.contains_key("a"));
        assert_eq!(data.get("b"), Some(&json!(2)));
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn event_defaults_to_user_namespace_when_deserialized() {
        let ev: InboundEvent = serde_json::from_value(json!({"actor_id": 7, "text": "hola"})).unwrap();
        assert_eq!(ev.context(), ActorContext::user(7));
        assert!(ev.profile.is_none());
    }

    #[test]
    fn display_name_joins_first_and_last() {
        assert_eq!(UserProfile::new("Иван", "Петров").display_name(), "Иван Петров");
        assert_eq!(UserProfile::new("Иван", "").display_name(), "Иван");
    }
}
