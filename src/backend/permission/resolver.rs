/**
 * Permission Resolver
 *
 * Evaluates a resource's policy for one request. Evaluation order is fixed:
 *
 * 1. `Open` grants.
 * 2. `Computed(f)` is replaced by `f(context, target, body)` and evaluated
 *    again. A computed policy that yields another `Computed` is denied.
 * 3. `Allowlist` grants when it contains the request's operation.
 * 4. `Deny` denies.
 * 5. `Predicates` dispatches to the predicate for the request's operation.
 *    A missing predicate denies. A `Filter` verdict narrows `read` and
 *    grants any other operation.
 */

use serde_json::Value;

use crate::backend::permission::{
    Access, Operation, PermissionPolicy, PolicyTarget, PredicateInput, RequestContext, Verdict,
};

/// Resolves a policy against requests
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver {
    policy: PermissionPolicy,
}

impl PermissionResolver {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    /// Decide what `context` may do to `target`
    pub fn resolve(&self, context: &RequestContext, target: &PolicyTarget, body: Option<&Value>) -> Access {
        evaluate(&self.policy, context, target, body, true)
    }
}

fn evaluate(
    policy: &PermissionPolicy,
    context: &RequestContext,
    target: &PolicyTarget,
    body: Option<&Value>,
    expand_computed: bool,
) -> Access {
    match policy {
        PermissionPolicy::Open => Access::Granted,
        PermissionPolicy::Computed(f) => {
            if !expand_computed {
                tracing::warn!("[Permission] Computed policy produced another computed policy, denying");
                return Access::Denied;
            }
            let concrete = f(context, target, body);
            evaluate(&concrete, context, target, body, false)
        }
        PermissionPolicy::Allowlist(ops) => match context.operation {
            Some(op) if ops.contains(&op) => Access::Granted,
            _ => Access::Denied,
        },
        PermissionPolicy::Deny => Access::Denied,
        PermissionPolicy::Predicates(predicates) => {
            let Some(op) = context.operation else {
                return Access::Denied;
            };
            let Some(predicate) = predicates.get(&op) else {
                tracing::debug!("[Permission] No predicate for {}, denying", op);
                return Access::Denied;
            };

            let input = PredicateInput {
                target: target.value(),
                body,
                context,
            };
            match predicate(&input) {
                Verdict::Allow => Access::Granted,
                Verdict::Deny => Access::Denied,
                Verdict::Filter(records) if op == Operation::Read => Access::Filtered(records),
                Verdict::Filter(_) => Access::Granted,
            }
        }
    }
}
