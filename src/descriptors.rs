//! Registration descriptors for introspection and diagnostics.

use crate::container::Container;
use crate::lifecycle::Lifecycle;
use crate::providers::ProviderKind;
use crate::token::Token;

/// Snapshot of one local registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Lifecycle, Provider, ProviderKind, Token};
///
/// let container = Container::new();
/// container.register_instance(Token::name("port"), 8080u16).unwrap();
/// container.register(Token::name("port"), Provider::factory(|_| 9090u16), Lifecycle::Transient).unwrap();
///
/// let descriptors = container.descriptors();
/// let kinds: Vec<ProviderKind> = descriptors.iter().map(|d| d.provider).collect();
/// assert_eq!(kinds, vec![ProviderKind::Value, ProviderKind::Factory]);
/// assert!(descriptors.iter().all(|d| d.lifecycle == Lifecycle::Transient));
/// ```
#[derive(Debug, Clone)]
pub struct RegistrationDescriptor {
    pub token: Token,
    pub lifecycle: Lifecycle,
    pub provider: ProviderKind,
    /// Position among the token's registrations, oldest first
    pub index: usize,
    /// Whether the registration currently holds a cached instance
    pub cached: bool,
}

impl Container {
    /// Describes the local registrations, grouped by token in registration order.
    ///
    /// Tokens are sorted by display name so output is stable.
    pub fn descriptors(&self) -> Vec<RegistrationDescriptor> {
        let registry = self.inner().registry.read();
        let mut tokens: Vec<_> = registry.iter().collect();
        tokens.sort_by_key(|(token, _)| token.display_name());

        let descriptors: Vec<RegistrationDescriptor> = tokens
            .into_iter()
            .flat_map(|(token, registrations)| {
                registrations
                    .iter()
                    .enumerate()
                    .map(move |(index, registration)| RegistrationDescriptor {
                        token: token.clone(),
                        lifecycle: registration.lifecycle,
                        provider: registration.provider.kind(),
                        index,
                        cached: registration.instance.is_set(),
                    })
            })
            .collect();
        descriptors
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("=== Container [{}] ===\n", self.config().display_label()));
        for d in self.descriptors() {
            s.push_str(&format!(
                "  {} #{}: {} / {}{}\n",
                d.token,
                d.index,
                d.provider,
                d.lifecycle,
                if d.cached { " (cached)" } else { "" }
            ));
        }
        if self.parent().is_some() {
            s.push_str("  (parent chain not shown)\n");
        }
        s
    }
}
