//! Translator registry

use crate::ast::{Expr, MemberAccess, MethodCall};

use super::equals::EqualsTranslator;
use super::traits::*;

/// Ordered registry of method-call and member translators.
///
/// There are no process-wide defaults: every provider is built explicitly,
/// either empty or with [`TranslatorProvider::relational`].
#[derive(Default)]
pub struct TranslatorProvider {
    method_call_translators: Vec<Box<dyn MethodCallTranslator>>,
    member_translators: Vec<Box<dyn MemberTranslator>>,
}

impl TranslatorProvider {
    /// A provider with no translators.
    pub fn new() -> Self {
        Self::default()
    }

    /// The generic relational translators.
    pub fn relational() -> Self {
        let mut provider = Self::new();
        provider.add_translators([Box::new(EqualsTranslator) as Box<dyn MethodCallTranslator>]);
        provider
    }

    /// Put `translators` ahead of every translator already registered,
    /// keeping their relative order.
    pub fn add_translators(
        &mut self,
        translators: impl IntoIterator<Item = Box<dyn MethodCallTranslator>>,
    ) {
        self.method_call_translators.splice(0..0, translators);
    }

    /// Put member `translators` ahead of every member translator already
    /// registered, keeping their relative order.
    pub fn add_member_translators(
        &mut self,
        translators: impl IntoIterator<Item = Box<dyn MemberTranslator>>,
    ) {
        self.member_translators.splice(0..0, translators);
    }

    /// Builder form of [`add_translators`](Self::add_translators).
    pub fn with_translators(
        mut self,
        translators: impl IntoIterator<Item = Box<dyn MethodCallTranslator>>,
    ) -> Self {
        self.add_translators(translators);
        self
    }

    /// Builder form of [`add_member_translators`](Self::add_member_translators).
    pub fn with_member_translators(
        mut self,
        translators: impl IntoIterator<Item = Box<dyn MemberTranslator>>,
    ) -> Self {
        self.add_member_translators(translators);
        self
    }

    /// Result of the first method-call translator that accepts `call`.
    pub fn translate_method_call(&self, call: &MethodCall) -> Option<Expr> {
        self.method_call_translators.iter().find_map(|translator| {
            let translated = translator.translate(call)?;
            tracing::debug!("{} translated {}", translator.id(), Expr::MethodCall(call.clone()));
            Some(translated)
        })
    }

    /// Result of the first member translator that accepts `member`.
    pub fn translate_member(&self, member: &MemberAccess) -> Option<Expr> {
        self.member_translators.iter().find_map(|translator| {
            let translated = translator.translate(member)?;
            tracing::debug!("{} translated member {}", translator.id(), member.member);
            Some(translated)
        })
    }

    /// Method-call translator ids in the order they are consulted.
    pub fn method_call_translator_ids(&self) -> Vec<&'static str> {
        self.method_call_translators.iter().map(|t| t.id()).collect()
    }

    /// Member translator ids in the order they are consulted.
    pub fn member_translator_ids(&self) -> Vec<&'static str> {
        self.member_translators.iter().map(|t| t.id()).collect()
    }
}

impl std::fmt::Debug for TranslatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorProvider")
            .field("method_call_translators", &self.method_call_translator_ids())
            .field("member_translators", &self.member_translator_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{constant, equals, fragment, member};
    use crate::ast::SqlFunction;
    use crate::storage::HostType;

    /// Claims every `Equals` call, whatever the operand types.
    struct LooseEquals;

    impl MethodCallTranslator for LooseEquals {
        fn id(&self) -> &'static str {
            "loose_equals"
        }

        fn translate(&self, call: &MethodCall) -> Option<Expr> {
            (call.method.name == "Equals").then(|| fragment("1 = 1", HostType::Bool))
        }
    }

    struct Never;

    impl MethodCallTranslator for Never {
        fn id(&self) -> &'static str {
            "never"
        }

        fn translate(&self, _call: &MethodCall) -> Option<Expr> {
            None
        }
    }

    struct IsClosed;

    impl MemberTranslator for IsClosed {
        fn id(&self) -> &'static str {
            "is_closed"
        }

        fn translate(&self, member: &MemberAccess) -> Option<Expr> {
            let receiver = member.receiver.as_deref()?;
            (member.member == "IsClosed").then(|| {
                Expr::Function(SqlFunction::on_instance(
                    receiver.clone(),
                    "STIsClosed",
                    vec![],
                    member.ty.clone(),
                ))
            })
        }
    }

    fn as_call(expression: Expr) -> MethodCall {
        match expression {
            Expr::MethodCall(call) => call,
            other => panic!("expected method call, got {}", other),
        }
    }

    #[test]
    fn test_relational_registers_equals() {
        let provider = TranslatorProvider::relational();
        assert_eq!(provider.method_call_translator_ids(), vec!["equals"]);
        assert!(provider.member_translator_ids().is_empty());
    }

    #[test]
    fn test_add_translators_prepends_in_order() {
        let mut provider = TranslatorProvider::relational();
        provider.add_translators([
            Box::new(Never) as Box<dyn MethodCallTranslator>,
            Box::new(LooseEquals),
        ]);
        assert_eq!(
            provider.method_call_translator_ids(),
            vec!["never", "loose_equals", "equals"]
        );
    }

    #[test]
    fn test_prepended_translator_overrides_generic() {
        let provider = TranslatorProvider::relational()
            .with_translators([Box::new(LooseEquals) as Box<dyn MethodCallTranslator>]);
        let call = as_call(equals(constant(1), constant(2)));
        assert_eq!(
            provider.translate_method_call(&call),
            Some(fragment("1 = 1", HostType::Bool))
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let provider = TranslatorProvider::relational();
        // Different operand types: the generic rule declines and nothing else applies.
        let call = as_call(equals(constant(1), constant("1")));
        assert_eq!(provider.translate_method_call(&call), None);
        assert_eq!(TranslatorProvider::new().translate_method_call(&call), None);
    }

    #[test]
    fn test_member_translators() {
        let provider = TranslatorProvider::new()
            .with_member_translators([Box::new(IsClosed) as Box<dyn MemberTranslator>]);
        let curve = constant("MULTILINESTRING EMPTY");
        let Expr::Member(access) = member(curve, "IsClosed", HostType::Bool) else {
            panic!("expected member");
        };
        let translated = provider.translate_member(&access).unwrap();
        assert_eq!(translated.to_string(), "'MULTILINESTRING EMPTY'.STIsClosed()");

        let Expr::Member(other) = member(constant(1), "Length", HostType::Int32) else {
            panic!("expected member");
        };
        assert_eq!(provider.translate_member(&other), None);
    }
}
