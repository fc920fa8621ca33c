use sha1::{Digest, Sha1};

use crate::host::widget::WidgetRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub widget: WidgetRef,
}

/// Menu entries captured at one scan, in host order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    pub items: Vec<MenuItem>,
}

impl MenuSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }

    /// Order-sensitive hash of the label sequence.
    pub fn content_hash(&self) -> u64 {
        let mut hash = self.items.len() as u64;
        for item in &self.items {
            hash = hash.wrapping_mul(31).wrapping_add(label_hash(&item.label));
        }
        hash
    }

    /// `Menu. {count} items: {a, b, ...}`
    pub fn summary(&self) -> String {
        format!("Menu. {} items: {}", self.items.len(), self.labels().join(", "))
    }
}

/// Stable per-label hash: first 8 bytes of the label's SHA-1.
pub fn label_hash(label: &str) -> u64 {
    let digest = Sha1::digest(label.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
