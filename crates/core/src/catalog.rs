//! The immutable service catalog.
//!
//! The catalog is the ground truth against which oracle output is validated:
//! only identifiers present here ever reach callers, and display names always
//! come from the catalog, not from the oracle.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result};

/// Immutable mapping from service identifier to canonical service name.
///
/// Fixed at process start, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: BTreeMap<u32, String>,
}

impl Catalog {
    /// Create a catalog from an id -> name mapping.
    pub fn new(services: BTreeMap<u32, String>) -> Result<Self> {
        if services.is_empty() {
            return Err(Error::config("catalog must contain at least one service"));
        }
        Ok(Self { services })
    }

    /// Load a catalog from a JSON object file of the form `{"1": "name", ...}`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
            Error::config(format!(
                "failed to read catalog file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let raw: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse catalog file: {}", e)))?;

        let mut services = BTreeMap::new();
        for (key, name) in raw {
            let id: u32 = key
                .parse()
                .map_err(|_| Error::config(format!("catalog key '{}' is not an integer", key)))?;
            services.insert(id, name);
        }

        Self::new(services)
    }

    /// Canonical name for an identifier, if it exists.
    pub fn name_of(&self, service_id: u32) -> Option<&str> {
        self.services.get(&service_id).map(String::as_str)
    }

    /// Whether the identifier belongs to the catalog.
    pub fn contains(&self, service_id: u32) -> bool {
        self.services.contains_key(&service_id)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog is empty. Never true for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Iterate entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.services.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl Default for Catalog {
    /// The sixteen-service reference deployment (Credsystem IVR).
    fn default() -> Self {
        let services: BTreeMap<u32, String> = [
            (1, "Consulta Limite / Vencimento do cartão / Melhor dia de compra"),
            (2, "Segunda via de boleto de acordo"),
            (3, "Segunda via de Fatura"),
            (4, "Status de Entrega do Cartão"),
            (5, "Status de cartão"),
            (6, "Solicitação de aumento de limite"),
            (7, "Cancelamento de cartão"),
            (8, "Telefones de seguradoras"),
            (9, "Desbloqueio de Cartão"),
            (10, "Esqueceu senha / Troca de senha"),
            (11, "Perda e roubo"),
            (12, "Consulta do Saldo"),
            (13, "Pagamento de contas"),
            (14, "Reclamações"),
            (15, "Atendimento humano"),
            (16, "Token de proposta"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();

        Self { services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_catalog_has_sixteen_entries() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.name_of(15), Some("Atendimento humano"));
        assert!(!catalog.contains(0));
        assert!(!catalog.contains(17));
    }

    #[test]
    fn empty_catalog_rejected() {
        let result = Catalog::new(BTreeMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn iteration_is_ordered() {
        let catalog = Catalog::default();
        let ids: Vec<u32> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn load_parses_json_object_keys() {
        let dir = std::env::temp_dir().join("finder-catalog-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("catalog.json");
        tokio::fs::write(&path, r#"{"1": "Billing", "2": "Support"}"#)
            .await
            .unwrap();

        let catalog = Catalog::load(&path).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name_of(2), Some("Support"));
    }

    #[tokio::test]
    async fn load_rejects_non_integer_keys() {
        let dir = std::env::temp_dir().join("finder-catalog-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("bad-catalog.json");
        tokio::fs::write(&path, r#"{"billing": "Billing"}"#).await.unwrap();

        assert!(Catalog::load(&path).await.is_err());
    }
}
