//! Converted statements: the unit every converter produces.

use smol_str::SmolStr;

/// The reactive primitive a statement's binding comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactivePrimitive {
    Ref,
    Computed,
    Watch,
    /// `toRefs(props)` destructuring.
    Props,
    /// A store instance (`const counterStore = useCounterStore()`).
    StoreBinding,
    /// `storeToRefs(store)` destructuring.
    StoreRefBinding,
    /// The `defineEmits` declaration.
    Emitter,
    /// A lifecycle hook registration, carrying the hook name.
    Lifecycle(&'static str),
}

impl ReactivePrimitive {
    /// The name imported for this primitive, if any.
    pub fn import_name(self) -> Option<&'static str> {
        match self {
            ReactivePrimitive::Ref => Some("ref"),
            ReactivePrimitive::Computed => Some("computed"),
            ReactivePrimitive::Watch => Some("watch"),
            ReactivePrimitive::Props => Some("toRefs"),
            ReactivePrimitive::StoreRefBinding => Some("storeToRefs"),
            ReactivePrimitive::Lifecycle(hook) => Some(hook),
            ReactivePrimitive::StoreBinding | ReactivePrimitive::Emitter => None,
        }
    }

    /// Whether names bound by this primitive are read through `.value`.
    pub fn is_ref_like(self) -> bool {
        matches!(
            self,
            ReactivePrimitive::Ref
                | ReactivePrimitive::Computed
                | ReactivePrimitive::StoreRefBinding
        )
    }
}

/// Where the imports of a statement come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageTag {
    /// A package other than the core framework (e.g. `pinia`).
    External(String),
    /// The binding is local; nothing to import.
    Ignore,
}

/// One synthesized statement of the setup body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedStatement {
    /// Statement text, before reference rewriting.
    pub text: String,
    /// Names bound by this statement, in order.
    pub names: Vec<SmolStr>,
    pub primitive: Option<ReactivePrimitive>,
    /// `None` means the core framework package.
    pub package: Option<PackageTag>,
}

impl ConvertedStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            names: Vec::new(),
            primitive: None,
            package: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn with_names(mut self, names: impl IntoIterator<Item = SmolStr>) -> Self {
        self.names.extend(names);
        self
    }

    pub fn with_primitive(mut self, primitive: ReactivePrimitive) -> Self {
        self.primitive = Some(primitive);
        self
    }

    pub fn with_package(mut self, package: PackageTag) -> Self {
        self.package = Some(package);
        self
    }

    /// Assembly priority: lower sorts first.
    pub fn sort_key(&self) -> u8 {
        sort_key(self.primitive)
    }
}

/// Fixed ordering of statement groups in the setup body.
pub fn sort_key(primitive: Option<ReactivePrimitive>) -> u8 {
    match primitive {
        Some(ReactivePrimitive::Emitter) => 0,
        Some(ReactivePrimitive::Props) => 1,
        Some(ReactivePrimitive::Ref) => 2,
        Some(ReactivePrimitive::StoreBinding) => 3,
        Some(ReactivePrimitive::StoreRefBinding) => 4,
        Some(ReactivePrimitive::Computed) => 5,
        _ => 6,
    }
}
