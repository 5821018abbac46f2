//! Outstanding members of a class hierarchy.
//!
//! The base chain is walked from the ultimate ancestor down to the type, so
//! an override in a more specific type cancels an abstract declaration
//! further up. Interface members are collected up front and struck off as
//! soon as any member in the chain matches them, whether that member is
//! abstract or concrete.
//!
//! The registry runs this walk to refuse concrete classes that still owe
//! members; the contract analyzer runs it to compute obligation sets.

use std::sync::Arc;

use tracing::trace;

use crate::method::MethodDef;
use crate::registry::{TypeDef, TypeId};
use crate::type_ref::TypeRef;

/// Parameter lists match element by element, by exact type identity.
pub fn parameters_match(a: &[TypeRef], b: &[TypeRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Whether a member called `member_name` can satisfy `interface_member`
/// declared on `interface_full_name`: either the plain name or the explicit
/// `<Interface>.<Member>` form.
pub fn satisfies_interface_name(
    member_name: &str,
    interface_full_name: &str,
    interface_member: &str,
) -> bool {
    if member_name == interface_member {
        return true;
    }
    member_name
        .strip_prefix(interface_full_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .map(|rest| rest == interface_member)
        .unwrap_or(false)
}

/// A member nothing in the hierarchy implements.
#[derive(Debug, Clone)]
pub struct PendingMember {
    pub method: MethodDef,
    pub owner: TypeId,
    pub owner_name: String,
    /// Owed through an interface rather than an abstract declaration.
    pub from_interface: bool,
}

impl PendingMember {
    fn same_slot(&self, other: &PendingMember) -> bool {
        self.method.name == other.method.name
            && parameters_match(&self.method.params, &other.method.params)
    }
}

/// Members still owed by the type at the end of `chain` (root first).
///
/// `interfaces` is the transitive interface set of that type. Abstract
/// members come first, then interface members, each in encounter order,
/// with no two entries sharing a name and parameter list.
pub fn pending_members(chain: &[Arc<TypeDef>], interfaces: &[Arc<TypeDef>]) -> Vec<PendingMember> {
    let mut interface_pool = collect_interface_members(interfaces);
    let mut abstract_pool: Vec<PendingMember> = Vec::new();

    for current in chain {
        for method in current.methods.iter().filter(|m| !m.is_static()) {
            if method.is_abstract() {
                record_abstract(&mut abstract_pool, current, method);
            } else if method.is_concrete_override() {
                if let Some(index) = abstract_pool.iter().position(|p| {
                    p.method.name == method.name && parameters_match(&p.method.params, &method.params)
                }) {
                    let satisfied = abstract_pool.remove(index);
                    trace!(
                        member = %method.name,
                        by = %current.full_name(),
                        declared_on = %satisfied.owner_name,
                        "override satisfies abstract member"
                    );
                }
            }

            // Every matching interface entry goes, not just the first.
            interface_pool.retain(|p| {
                let matched = satisfies_interface_name(&method.name, &p.owner_name, &p.method.name)
                    && parameters_match(&p.method.params, &method.params);
                if matched {
                    trace!(
                        member = %method.name,
                        by = %current.full_name(),
                        interface = %p.owner_name,
                        "member satisfies interface member"
                    );
                }
                !matched
            });
        }
    }

    let mut pending: Vec<PendingMember> = Vec::with_capacity(abstract_pool.len() + interface_pool.len());
    for member in abstract_pool.into_iter().chain(interface_pool) {
        if !pending.iter().any(|p| p.same_slot(&member)) {
            pending.push(member);
        }
    }
    pending
}

/// Public instance members of every interface, in interface order.
fn collect_interface_members(interfaces: &[Arc<TypeDef>]) -> Vec<PendingMember> {
    interfaces
        .iter()
        .flat_map(|iface| {
            iface
                .methods
                .iter()
                .filter(|m| m.is_public() && !m.is_static())
                .map(move |m| PendingMember {
                    method: m.clone(),
                    owner: iface.id,
                    owner_name: iface.full_name(),
                    from_interface: true,
                })
        })
        .collect()
}

/// Add an abstract member. Re-abstracting an inherited slot replaces the
/// older entry in place, so the most derived declaration wins.
fn record_abstract(pool: &mut Vec<PendingMember>, owner: &TypeDef, method: &MethodDef) {
    let member = PendingMember {
        method: method.clone(),
        owner: owner.id,
        owner_name: owner.full_name(),
        from_interface: false,
    };
    match pool.iter_mut().find(|p| p.same_slot(&member)) {
        Some(existing) => *existing = member,
        None => {
            trace!(member = %method.name, on = %owner.full_name(), "abstract member");
            pool.push(member);
        }
    }
}
