//! Declarative helpers shared by the model, the property store and the
//! elements.
//!
//! `named_type!` and `property_store!` are exported so that element sets
//! outside this crate can be declared the same way the built-in ones are.

/// Declare one or more [`NamedType`](crate::model::NamedType) aliases together
/// with their tag types.
///
/// ```rust
/// adm::named_type! {
///     /// Gain applied to an object, in dB.
///     pub Gain(f64) as GainTag = "gain";
/// }
///
/// let gain = Gain::new(-3.0);
/// assert_eq!(gain, -3.0);
/// assert_eq!(<Gain as adm::Property>::NAME, "gain");
/// ```
#[macro_export]
macro_rules! named_type {
    ($(
        $(#[$meta:meta])*
        $vis:vis $name:ident($inner:ty $(, $validator:ty)?) as $tag:ident = $xml:literal;
    )*) => {$(
        #[doc = concat!("Tag of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $tag;

        impl $crate::model::PropertyTag for $tag {
            const NAME: &'static str = $xml;
        }

        $(#[$meta])*
        $vis type $name = $crate::model::NamedType<$inner, $tag $(, $validator)?>;
    )*};
}

/// Declare a property store: a struct with one slot per property, split into
/// mandatory, optional and defaulted properties.
///
/// Each property type gets its own `StoresProperty` impl, so listing a type in
/// two sections fails to build, and accessing a property the store does not
/// declare fails to build as well.
///
/// ```rust
/// use adm::prelude::*;
/// use adm::{AudioObjectName, DefaultFactory, Importance, Start, Time};
///
/// pub struct Defaults;
/// impl DefaultFactory<Start> for Defaults {
///     fn create() -> Start {
///         Start::new(Time::ZERO)
///     }
/// }
///
/// adm::property_store! {
///     pub struct Example {
///         mandatory { name: AudioObjectName }
///         optional { importance: Importance }
///         defaulted(Defaults) { start: Start }
///     }
/// }
///
/// let mut store = Example::new("name".into());
/// assert!(!store.has::<Importance>());
/// assert!(store.is_default::<Start>());
/// store.set(Importance::try_new(4).unwrap());
/// assert_eq!(store.get::<Importance>().unwrap(), 4);
/// ```
///
/// Properties outside the declared sets are rejected at build time:
///
/// ```compile_fail
/// use adm::prelude::*;
/// use adm::{AudioObjectName, Importance};
///
/// adm::property_store! {
///     pub struct NameOnly {
///         mandatory { name: AudioObjectName }
///         optional {}
///         defaulted(adm::store::NoDefaults) {}
///     }
/// }
///
/// let store = NameOnly::new("name".into());
/// store.has::<Importance>();
/// ```
///
/// So is unsetting a mandatory property:
///
/// ```compile_fail
/// use adm::prelude::*;
/// use adm::AudioObjectName;
///
/// adm::property_store! {
///     pub struct NameOnly {
///         mandatory { name: AudioObjectName }
///         optional {}
///         defaulted(adm::store::NoDefaults) {}
///     }
/// }
///
/// let mut store = NameOnly::new("name".into());
/// store.unset::<AudioObjectName>();
/// ```
#[macro_export]
macro_rules! property_store {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            mandatory { $($m:ident: $mt:ty),* $(,)? }
            optional { $($o:ident: $ot:ty),* $(,)? }
            defaulted($defaults:ty) { $($d:ident: $dt:ty),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $($m: $mt,)*
            $($o: ::core::option::Option<$ot>,)*
            $($d: ::core::option::Option<$dt>,)*
        }

        impl $name {
            /// Create the store from its mandatory properties. Optional and
            /// defaulted slots start out empty.
            #[allow(clippy::too_many_arguments)]
            pub fn new($($m: $mt),*) -> Self {
                Self {
                    $($m,)*
                    $($o: ::core::option::Option::None,)*
                    $($d: ::core::option::Option::None,)*
                }
            }
        }

        $(
            impl $crate::store::StoresProperty<$mt> for $name {
                const PRESENCE: $crate::store::Presence = $crate::store::Presence::Mandatory;

                fn slot(&self) -> ::core::option::Option<&$mt> {
                    ::core::option::Option::Some(&self.$m)
                }

                fn fill(&mut self, value: $mt) {
                    self.$m = value;
                }
            }
        )*

        $(
            impl $crate::store::StoresProperty<$ot> for $name {
                const PRESENCE: $crate::store::Presence = $crate::store::Presence::Optional;

                fn slot(&self) -> ::core::option::Option<&$ot> {
                    self.$o.as_ref()
                }

                fn fill(&mut self, value: $ot) {
                    self.$o = ::core::option::Option::Some(value);
                }
            }

            impl $crate::store::ClearsProperty<$ot> for $name {
                fn clear(&mut self) {
                    self.$o = ::core::option::Option::None;
                }
            }
        )*

        $(
            impl $crate::store::StoresProperty<$dt> for $name {
                const PRESENCE: $crate::store::Presence = $crate::store::Presence::Defaulted;

                fn slot(&self) -> ::core::option::Option<&$dt> {
                    self.$d.as_ref()
                }

                fn fill(&mut self, value: $dt) {
                    self.$d = ::core::option::Option::Some(value);
                }

                fn fallback() -> ::core::option::Option<$dt> {
                    ::core::option::Option::Some(<$defaults as $crate::store::DefaultFactory<$dt>>::create())
                }
            }

            impl $crate::store::ClearsProperty<$dt> for $name {
                fn clear(&mut self) {
                    self.$d = ::core::option::Option::None;
                }
            }
        )*

        impl $crate::store::PropertyStore for $name {
            fn entries(&self) -> ::std::vec::Vec<$crate::store::PropertyEntry> {
                #[allow(unused_mut)]
                let mut entries = ::std::vec::Vec::new();
                $(
                    entries.push($crate::store::PropertyEntry::explicit(
                        &self.$m,
                        $crate::store::Presence::Mandatory,
                    ));
                )*
                $(
                    if let ::core::option::Option::Some(value) = &self.$o {
                        entries.push($crate::store::PropertyEntry::explicit(
                            value,
                            $crate::store::Presence::Optional,
                        ));
                    }
                )*
                $(
                    entries.push(match &self.$d {
                        ::core::option::Option::Some(value) => $crate::store::PropertyEntry::explicit(
                            value,
                            $crate::store::Presence::Defaulted,
                        ),
                        ::core::option::Option::None => $crate::store::PropertyEntry::fallback(
                            &<$defaults as $crate::store::DefaultFactory<$dt>>::create(),
                        ),
                    });
                )*
                entries
            }
        }
    };
}

/// Implement `ElementProperty` for properties an element forwards straight to
/// its store, and `UnsetProperty` for the ones listed under `unset`.
macro_rules! element_properties {
    (@reads $property:ty) => {
        fn read_property(&self) -> $crate::Result<$property> {
            $crate::store::PropertyStore::get::<$property>(&self.state.read().properties)
        }

        fn has_property(&self) -> bool {
            $crate::store::PropertyStore::has::<$property>(&self.state.read().properties)
        }

        fn property_is_default(&self) -> bool {
            $crate::store::PropertyStore::is_default::<$property>(&self.state.read().properties)
        }
    };

    ($element:ty { $($property:ty),* $(,)? } unset { $($optional:ty),* $(,)? }) => {
        $(
            impl $crate::elements::ElementProperty<$property> for $element {
                element_properties!(@reads $property);

                fn write_property(&self, value: $property) -> $crate::Result<()> {
                    $crate::store::PropertyStore::set(&mut self.state.write().properties, value);
                    Ok(())
                }
            }
        )*
        $(
            impl $crate::elements::UnsetProperty<$optional> for $element {
                fn unset_property(&self) {
                    $crate::store::PropertyStore::unset::<$optional>(&mut self.state.write().properties);
                }
            }
        )*
    };

}

/// Id property of an element whose id carries no type descriptor: the
/// undefined id is always accepted, anything else must be free in the
/// element's document.
macro_rules! element_id_property {
    ($element:ty, $id:ty) => {
        impl $crate::elements::ElementProperty<$id> for $element {
            element_properties!(@reads $id);

            fn write_property(&self, id: $id) -> $crate::Result<()> {
                if !$crate::model::ElementId::is_undefined(&id) {
                    let parent = self.state.read().parent.clone();
                    $crate::elements::reference::ensure_id_available(self, &parent, &id)?;
                }
                $crate::store::PropertyStore::set(&mut self.state.write().properties, id);
                Ok(())
            }
        }
    };
}

/// Accessor traits, `Display` and `Debug` shared by every element.
macro_rules! element_common {
    ($element:ident) => {
        impl $crate::elements::PropertyExt for $element {}
        impl $crate::elements::ReferenceExt for $element {}

        impl ::std::fmt::Display for $element {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let entries = $crate::elements::DocumentElement::properties(self);
                $crate::elements::write_overview(f, &entries)
            }
        }

        impl ::std::fmt::Debug for $element {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($element), self)
            }
        }
    };
}
