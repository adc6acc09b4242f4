//! Shared bean fixtures for the integration suites.
//!
//! Each fixture is a plain Rust type plus the capability surface a host
//! binding would register for it. Some fixtures are deliberately broken
//! (unstable hashing, equality that skips a field, constructors that drop
//! or transform arguments) so the verifier has something to catch.

use std::cell::Cell;
use std::hash::{Hash, Hasher};

use beancheck_core::{
    BeanChecker, BeanCheckerBuilder, BeanInstance, InvokeError, ParamSpec, TypeDescriptor,
    TypeRegistry, TypeSurface, Value,
};

/// A well-behaved bean: two properties, value equality, stable hashing.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Account {
    pub field_a: String,
    pub field_b: i32,
}

fn account_surface() -> TypeSurface {
    TypeSurface::builder::<Account>("Account")
        .ctor0(Account::default)
        .ctor(
            vec![
                ParamSpec::named("field_a", TypeDescriptor::Str),
                ParamSpec::named("field_b", TypeDescriptor::I32),
            ],
            |args| {
                Ok(Account {
                    field_a: args.take(0)?,
                    field_b: args.take(1)?,
                })
            },
        )
        .reader("field_a", TypeDescriptor::Str, |a: &Account| {
            Value::from(a.field_a.clone())
        })
        .writer("set_field_a", TypeDescriptor::Str, |a: &mut Account, v| {
            a.field_a = v.try_into()?;
            Ok(())
        })
        .reader("field_b", TypeDescriptor::I32, |a: &Account| {
            Value::from(a.field_b)
        })
        .writer("set_field_b", TypeDescriptor::I32, |a: &mut Account, v| {
            a.field_b = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Reports a different hash code on every call while staying equal.
#[derive(Debug, Default)]
pub struct Tally {
    pub label: String,
    pub hash_calls: Cell<u64>,
}

impl PartialEq for Tally {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Hash for Tally {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let calls = self.hash_calls.get();
        self.hash_calls.set(calls + 1);
        state.write_u64(calls);
    }
}

fn tally_surface() -> TypeSurface {
    TypeSurface::builder::<Tally>("Tally")
        .ctor0(Tally::default)
        .reader("label", TypeDescriptor::Str, |t: &Tally| {
            Value::from(t.label.clone())
        })
        .writer("set_label", TypeDescriptor::Str, |t: &mut Tally, v| {
            t.label = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Equality and hashing skip `unseen`, so mutating it changes nothing.
#[derive(Debug, Default)]
pub struct Lopsided {
    pub seen: String,
    pub unseen: i32,
}

impl PartialEq for Lopsided {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Hash for Lopsided {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seen.hash(state);
    }
}

fn lopsided_surface() -> TypeSurface {
    TypeSurface::builder::<Lopsided>("Lopsided")
        .ctor0(Lopsided::default)
        .reader("seen", TypeDescriptor::Str, |l: &Lopsided| {
            Value::from(l.seen.clone())
        })
        .writer("set_seen", TypeDescriptor::Str, |l: &mut Lopsided, v| {
            l.seen = v.try_into()?;
            Ok(())
        })
        .reader("unseen", TypeDescriptor::I32, |l: &Lopsided| {
            Value::from(l.unseen)
        })
        .writer("set_unseen", TypeDescriptor::I32, |l: &mut Lopsided, v| {
            l.unseen = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Self-referential bean for the recursion policies.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Node {
    pub tag: String,
    pub next: Option<Box<Node>>,
}

fn node_surface() -> TypeSurface {
    TypeSurface::builder::<Node>("Node")
        .ctor0(Node::default)
        .reader("tag", TypeDescriptor::Str, |n: &Node| {
            Value::from(n.tag.clone())
        })
        .writer("set_tag", TypeDescriptor::Str, |n: &mut Node, v| {
            n.tag = v.try_into()?;
            Ok(())
        })
        .reader("next", TypeDescriptor::bean("Node"), |n: &Node| {
            n.next.as_ref().map_or(Value::Absent, |next| {
                Value::Bean(BeanInstance::of("Node", (**next).clone()))
            })
        })
        .writer("set_next", TypeDescriptor::bean("Node"), |n: &mut Node, v| {
            n.next = v.try_bean_opt::<Node>()?.map(Box::new);
            Ok(())
        })
        .build()
}

/// Leaf of the nested-graph fixtures.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Person {
    pub name: String,
    pub age: u8,
}

fn person_surface() -> TypeSurface {
    TypeSurface::builder::<Person>("Person")
        .ctor0(Person::default)
        .reader("name", TypeDescriptor::Str, |p: &Person| {
            Value::from(p.name.clone())
        })
        .writer("set_name", TypeDescriptor::Str, |p: &mut Person, v| {
            p.name = v.try_into()?;
            Ok(())
        })
        .reader("age", TypeDescriptor::U8, |p: &Person| Value::from(p.age))
        .writer("set_age", TypeDescriptor::U8, |p: &mut Person, v| {
            p.age = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Bean with a mandatory nested bean property.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Wallet {
    pub id: String,
    pub owner: Person,
}

fn wallet_surface() -> TypeSurface {
    TypeSurface::builder::<Wallet>("Wallet")
        .ctor0(Wallet::default)
        .reader("id", TypeDescriptor::Str, |w: &Wallet| {
            Value::from(w.id.clone())
        })
        .writer("set_id", TypeDescriptor::Str, |w: &mut Wallet, v| {
            w.id = v.try_into()?;
            Ok(())
        })
        .reader("owner", TypeDescriptor::bean("Person"), |w: &Wallet| {
            Value::Bean(BeanInstance::of("Person", w.owner.clone()))
        })
        .writer("set_owner", TypeDescriptor::bean("Person"), |w: &mut Wallet, v| {
            w.owner = v.try_bean()?;
            Ok(())
        })
        .build()
}

/// Exercises the ignore rules: two plain properties and one optional
/// self-typed nesting.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct IgnoreBean {
    pub field_a: String,
    pub field_b: String,
    pub field_c: Option<Box<IgnoreBean>>,
}

fn ignore_bean_surface() -> TypeSurface {
    TypeSurface::builder::<IgnoreBean>("IgnoreBean")
        .ctor0(IgnoreBean::default)
        .reader("field_a", TypeDescriptor::Str, |b: &IgnoreBean| {
            Value::from(b.field_a.clone())
        })
        .writer("set_field_a", TypeDescriptor::Str, |b: &mut IgnoreBean, v| {
            b.field_a = v.try_into()?;
            Ok(())
        })
        .reader("field_b", TypeDescriptor::Str, |b: &IgnoreBean| {
            Value::from(b.field_b.clone())
        })
        .writer("set_field_b", TypeDescriptor::Str, |b: &mut IgnoreBean, v| {
            b.field_b = v.try_into()?;
            Ok(())
        })
        .reader("field_c", TypeDescriptor::bean("IgnoreBean"), |b: &IgnoreBean| {
            b.field_c.as_ref().map_or(Value::Absent, |nested| {
                Value::Bean(BeanInstance::of("IgnoreBean", (**nested).clone()))
            })
        })
        .writer(
            "set_field_c",
            TypeDescriptor::bean("IgnoreBean"),
            |b: &mut IgnoreBean, v| {
                b.field_c = v.try_bean_opt::<IgnoreBean>()?.map(Box::new);
                Ok(())
            },
        )
        .build()
}

/// Holds an [`IgnoreBean`] so per-type ignores can be observed from a
/// second type.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Keeper {
    pub field_a: String,
    pub field_b: IgnoreBean,
}

fn keeper_surface() -> TypeSurface {
    TypeSurface::builder::<Keeper>("Keeper")
        .ctor0(Keeper::default)
        .reader("field_a", TypeDescriptor::Str, |k: &Keeper| {
            Value::from(k.field_a.clone())
        })
        .writer("set_field_a", TypeDescriptor::Str, |k: &mut Keeper, v| {
            k.field_a = v.try_into()?;
            Ok(())
        })
        .reader("field_b", TypeDescriptor::bean("IgnoreBean"), |k: &Keeper| {
            Value::Bean(BeanInstance::of("IgnoreBean", k.field_b.clone()))
        })
        .writer(
            "set_field_b",
            TypeDescriptor::bean("IgnoreBean"),
            |k: &mut Keeper, v| {
                k.field_b = v.try_bean()?;
                Ok(())
            },
        )
        .build()
}

/// Container properties of every supported species.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Sack {
    pub names: Vec<String>,
    pub scores: Vec<i64>,
    pub tags: Vec<String>,
}

fn sack_surface() -> TypeSurface {
    TypeSurface::builder::<Sack>("Sack")
        .ctor0(Sack::default)
        .reader(
            "names",
            TypeDescriptor::list(TypeDescriptor::Str),
            |s: &Sack| Value::Seq(s.names.iter().cloned().map(Value::from).collect()),
        )
        .writer(
            "set_names",
            TypeDescriptor::list(TypeDescriptor::Str),
            |s: &mut Sack, v| {
                s.names = v.try_items()?;
                Ok(())
            },
        )
        .reader(
            "scores",
            TypeDescriptor::array(TypeDescriptor::I64),
            |s: &Sack| Value::Seq(s.scores.iter().copied().map(Value::from).collect()),
        )
        .writer(
            "set_scores",
            TypeDescriptor::array(TypeDescriptor::I64),
            |s: &mut Sack, v| {
                s.scores = v.try_items()?;
                Ok(())
            },
        )
        .reader(
            "tags",
            TypeDescriptor::set(TypeDescriptor::Str),
            |s: &Sack| Value::Set(s.tags.iter().cloned().map(Value::from).collect()),
        )
        .writer(
            "set_tags",
            TypeDescriptor::set(TypeDescriptor::Str),
            |s: &mut Sack, v| {
                s.tags = v.try_items()?;
                Ok(())
            },
        )
        .build()
}

/// Enum-typed property fixture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Hash)]
pub enum Colour {
    #[default]
    Red,
    Green,
    Blue,
}

/// Bean holding a [`Colour`].
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Palette {
    pub colour: Colour,
}

fn palette_surface() -> TypeSurface {
    let colour_descriptor = || TypeDescriptor::enumeration("Colour", ["Red", "Green", "Blue"]);
    TypeSurface::builder::<Palette>("Palette")
        .ctor0(Palette::default)
        .reader("colour", colour_descriptor(), |p: &Palette| {
            let variant = match p.colour {
                Colour::Red => "Red",
                Colour::Green => "Green",
                Colour::Blue => "Blue",
            };
            Value::Enum {
                ty: "Colour".into(),
                variant: variant.to_owned(),
            }
        })
        .writer("set_colour", colour_descriptor(), |p: &mut Palette, v| {
            p.colour = match v.try_variant()? {
                "Red" => Colour::Red,
                "Green" => Colour::Green,
                "Blue" => Colour::Blue,
                other => {
                    return Err(InvokeError::Failed {
                        reason: format!("unknown Colour variant `{other}`"),
                    });
                }
            };
            Ok(())
        })
        .build()
}

/// Single-variant enum: no distinct value exists for its property.
#[derive(Debug, Default, Clone, Copy, PartialEq, Hash)]
pub enum OnlyOn {
    #[default]
    On,
}

/// Bean whose only property admits exactly one inhabitant.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Mono {
    pub state: OnlyOn,
}

fn mono_surface() -> TypeSurface {
    let state_descriptor = || TypeDescriptor::enumeration("OnlyOn", ["On"]);
    TypeSurface::builder::<Mono>("Mono")
        .ctor0(Mono::default)
        .reader("state", state_descriptor(), |_m: &Mono| Value::Enum {
            ty: "OnlyOn".into(),
            variant: String::from("On"),
        })
        .writer("set_state", state_descriptor(), |m: &mut Mono, v| {
            v.try_variant()?;
            m.state = OnlyOn::On;
            Ok(())
        })
        .build()
}

/// Only a non-public zero-argument constructor: the resolver must force
/// it.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Hermit {
    pub code: u32,
}

fn hermit_surface() -> TypeSurface {
    TypeSurface::builder::<Hermit>("Hermit")
        .private_ctor0(Hermit::default)
        .reader("code", TypeDescriptor::U32, |h: &Hermit| Value::from(h.code))
        .writer("set_code", TypeDescriptor::U32, |h: &mut Hermit, v| {
            h.code = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Constructor-initialized, read-only bean.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Pair {
    pub left: String,
    pub right: i64,
}

fn pair_surface() -> TypeSurface {
    TypeSurface::builder::<Pair>("Pair")
        .ctor(
            vec![
                ParamSpec::named("left", TypeDescriptor::Str),
                ParamSpec::named("right", TypeDescriptor::I64),
            ],
            |args| {
                Ok(Pair {
                    left: args.take(0)?,
                    right: args.take(1)?,
                })
            },
        )
        .reader("left", TypeDescriptor::Str, |p: &Pair| {
            Value::from(p.left.clone())
        })
        .reader("right", TypeDescriptor::I64, |p: &Pair| Value::from(p.right))
        .build()
}

/// Drops its second constructor argument on the floor.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Sloppy {
    pub kept: String,
}

fn sloppy_surface() -> TypeSurface {
    TypeSurface::builder::<Sloppy>("Sloppy")
        .ctor(
            vec![
                ParamSpec::named("kept", TypeDescriptor::Str),
                ParamSpec::unnamed(TypeDescriptor::I64),
            ],
            |args| Ok(Sloppy { kept: args.take(0)? }),
        )
        .reader("kept", TypeDescriptor::Str, |s: &Sloppy| {
            Value::from(s.kept.clone())
        })
        .build()
}

/// Transforms its named constructor argument before storing it, so the
/// like-named property never reads back the argument verbatim.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Twist {
    pub label: String,
}

fn twist_surface() -> TypeSurface {
    TypeSurface::builder::<Twist>("Twist")
        .ctor(
            vec![ParamSpec::named("label", TypeDescriptor::Str)],
            |args| {
                let label: String = args.take(0)?;
                Ok(Twist {
                    label: format!("{label}!"),
                })
            },
        )
        .reader("label", TypeDescriptor::Str, |t: &Twist| {
            Value::from(t.label.clone())
        })
        .build()
}

/// Writer appends instead of replacing, so restoring a value never
/// restores equality.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Appender {
    pub log: String,
}

fn appender_surface() -> TypeSurface {
    TypeSurface::builder::<Appender>("Appender")
        .ctor0(Appender::default)
        .reader("log", TypeDescriptor::Str, |a: &Appender| {
            Value::from(a.log.clone())
        })
        .writer("set_log", TypeDescriptor::Str, |a: &mut Appender, v| {
            let suffix: String = v.try_into()?;
            a.log.push_str(&suffix);
            Ok(())
        })
        .build()
}

/// Container whose element type was never resolved.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Opaque {
    pub data: Vec<String>,
}

fn opaque_surface() -> TypeSurface {
    let unresolved = || TypeDescriptor::Collection {
        kind: beancheck_core::CollectionKind::List,
        element: None,
    };
    TypeSurface::builder::<Opaque>("Opaque")
        .ctor0(Opaque::default)
        .reader("data", unresolved(), |o: &Opaque| {
            Value::Seq(o.data.iter().cloned().map(Value::from).collect())
        })
        .writer("set_data", unresolved(), |o: &mut Opaque, v| {
            o.data = v.try_items()?;
            Ok(())
        })
        .build()
}

/// Container species with no canonical implementation.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct RingHolder {
    pub ring: Vec<String>,
}

fn ring_holder_surface() -> TypeSurface {
    let ring_descriptor = || TypeDescriptor::Collection {
        kind: beancheck_core::CollectionKind::Other("RingBuffer".into()),
        element: Some(Box::new(TypeDescriptor::Str)),
    };
    TypeSurface::builder::<RingHolder>("RingHolder")
        .ctor0(RingHolder::default)
        .reader("ring", ring_descriptor(), |r: &RingHolder| {
            Value::Seq(r.ring.iter().cloned().map(Value::from).collect())
        })
        .writer("set_ring", ring_descriptor(), |r: &mut RingHolder, v| {
            r.ring = v.try_items()?;
            Ok(())
        })
        .build()
}

/// Property declared as an enum with no variants.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Voidish {
    pub state: String,
}

fn voidish_surface() -> TypeSurface {
    let empty = || TypeDescriptor::enumeration("Void", Vec::<String>::new());
    TypeSurface::builder::<Voidish>("Voidish")
        .ctor0(Voidish::default)
        .reader("state", empty(), |_v: &Voidish| Value::Absent)
        .writer("set_state", empty(), |v: &mut Voidish, value| {
            v.state = value.try_variant()?.to_owned();
            Ok(())
        })
        .build()
}

/// References a bean type that is never registered.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Orphan {
    pub widget_count: i32,
}

fn orphan_surface() -> TypeSurface {
    TypeSurface::builder::<Orphan>("Orphan")
        .ctor0(Orphan::default)
        .reader("widget", TypeDescriptor::bean("Widget"), |_o: &Orphan| {
            Value::Absent
        })
        .writer(
            "set_widget",
            TypeDescriptor::bean("Widget"),
            |o: &mut Orphan, _v| {
                o.widget_count += 1;
                Ok(())
            },
        )
        .build()
}

/// One accessor-paired property plus one state slot reachable only as a
/// backing field.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Ledger {
    pub note: String,
    pub balance: i64,
}

fn ledger_surface() -> TypeSurface {
    TypeSurface::builder::<Ledger>("Ledger")
        .ctor0(Ledger::default)
        .reader("note", TypeDescriptor::Str, |l: &Ledger| {
            Value::from(l.note.clone())
        })
        .writer("set_note", TypeDescriptor::Str, |l: &mut Ledger, v| {
            l.note = v.try_into()?;
            Ok(())
        })
        .field(
            "balance",
            TypeDescriptor::I64,
            |l: &Ledger| Value::from(l.balance),
            |l: &mut Ledger, v| {
                l.balance = v.try_into()?;
                Ok(())
            },
        )
        .build()
}

/// State reachable only through a non-public field slot.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Vault {
    pub secret: String,
}

fn vault_surface() -> TypeSurface {
    TypeSurface::builder::<Vault>("Vault")
        .ctor0(Vault::default)
        .private_field(
            "secret",
            TypeDescriptor::Str,
            |v: &Vault| Value::from(v.secret.clone()),
            |v: &mut Vault, value| {
                v.secret = value.try_into()?;
                Ok(())
            },
        )
        .build()
}

/// Backing field declared with a different type than the accessor pair.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Clash {
    pub amount: i32,
}

fn clash_surface() -> TypeSurface {
    TypeSurface::builder::<Clash>("Clash")
        .ctor0(Clash::default)
        .reader("amount", TypeDescriptor::I32, |c: &Clash| {
            Value::from(c.amount)
        })
        .writer("set_amount", TypeDescriptor::I32, |c: &mut Clash, v| {
            c.amount = v.try_into()?;
            Ok(())
        })
        .field(
            "amount",
            TypeDescriptor::I64,
            |c: &Clash| Value::from(i64::from(c.amount)),
            |c: &mut Clash, v| {
                let wide: i64 = v.try_into()?;
                c.amount = i32::try_from(wide).unwrap_or_default();
                Ok(())
            },
        )
        .build()
}

/// Carries a second, conflicting writer for an already-paired property.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Gadget {
    pub size: i32,
}

fn gadget_surface() -> TypeSurface {
    TypeSurface::builder::<Gadget>("Gadget")
        .ctor0(Gadget::default)
        .reader("size", TypeDescriptor::I32, |g: &Gadget| Value::from(g.size))
        .writer("set_size", TypeDescriptor::I32, |g: &mut Gadget, v| {
            g.size = v.try_into()?;
            Ok(())
        })
        .writer("set_size", TypeDescriptor::I32, |g: &mut Gadget, v| {
            let doubled: i32 = v.try_into()?;
            g.size = doubled.saturating_mul(2);
            Ok(())
        })
        .build()
}

/// Carries a writer with no corresponding readable property.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Tagger {
    pub id: i32,
    pub label: String,
}

fn tagger_surface() -> TypeSurface {
    TypeSurface::builder::<Tagger>("Tagger")
        .ctor0(Tagger::default)
        .reader("id", TypeDescriptor::I32, |t: &Tagger| Value::from(t.id))
        .writer("set_id", TypeDescriptor::I32, |t: &mut Tagger, v| {
            t.id = v.try_into()?;
            Ok(())
        })
        .writer("set_label", TypeDescriptor::Str, |t: &mut Tagger, v| {
            t.label = v.try_into()?;
            Ok(())
        })
        .build()
}

/// Read-only property with no writer at all.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Peek {
    pub view: String,
}

fn peek_surface() -> TypeSurface {
    TypeSurface::builder::<Peek>("Peek")
        .ctor0(Peek::default)
        .reader("view", TypeDescriptor::Str, |p: &Peek| {
            Value::from(p.view.clone())
        })
        .build()
}

/// Carries a reader-convention operation that yields no value.
#[derive(Debug, Default, Clone, PartialEq, Hash)]
pub struct Shouter {
    pub volume: i32,
}

fn shouter_surface() -> TypeSurface {
    TypeSurface::builder::<Shouter>("Shouter")
        .ctor0(Shouter::default)
        .reader("volume", TypeDescriptor::I32, |s: &Shouter| {
            Value::from(s.volume)
        })
        .writer("set_volume", TypeDescriptor::I32, |s: &mut Shouter, v| {
            s.volume = v.try_into()?;
            Ok(())
        })
        .action("get_noise")
        .build()
}

/// Builds a registry containing every fixture surface.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(account_surface())
        .register(tally_surface())
        .register(lopsided_surface())
        .register(node_surface())
        .register(person_surface())
        .register(wallet_surface())
        .register(ignore_bean_surface())
        .register(keeper_surface())
        .register(sack_surface())
        .register(palette_surface())
        .register(mono_surface())
        .register(hermit_surface())
        .register(pair_surface())
        .register(sloppy_surface())
        .register(twist_surface())
        .register(appender_surface())
        .register(opaque_surface())
        .register(ring_holder_surface())
        .register(voidish_surface())
        .register(orphan_surface())
        .register(ledger_surface())
        .register(vault_surface())
        .register(clash_surface())
        .register(gadget_surface())
        .register(tagger_surface())
        .register(peek_surface())
        .register(shouter_surface());
    registry
}

/// A checker over the fixture registry with a fixed seed.
pub fn checker(seed: u64) -> BeanChecker {
    BeanCheckerBuilder::new(registry()).with_rng_seed(seed).build()
}

/// A builder over the fixture registry for tests that tweak policy.
pub fn builder() -> BeanCheckerBuilder {
    BeanCheckerBuilder::new(registry())
}
