//! Host `Option<T>` ↔ device-side optional bridge
//!
//! WGSL has no optional type, so kernels receive a value plus a presence flag
//! laid out side by side in a uniform block.

/// Device-compatible optional value
///
/// `#[repr(C)]` pair of `value` and `present`, both of type `T` so the layout
/// has no padding. An absent value is stored as `T::default()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceOptional<T> {
    value: T,
    present: T,
}

macro_rules! impl_device_optional {
    ($($t:ty),*) => {
        $(
            impl DeviceOptional<$t> {
                /// Present value
                #[must_use]
                pub const fn some(value: $t) -> Self {
                    Self { value, present: 1 }
                }

                /// Absent value
                #[must_use]
                pub const fn none() -> Self {
                    Self { value: 0, present: 0 }
                }

                /// Whether a value is present
                #[must_use]
                pub const fn is_some(&self) -> bool {
                    self.present != 0
                }

                /// Contained value, if present
                #[must_use]
                pub const fn get(&self) -> Option<$t> {
                    if self.is_some() {
                        Some(self.value)
                    } else {
                        None
                    }
                }
            }

            impl From<Option<$t>> for DeviceOptional<$t> {
                fn from(opt: Option<$t>) -> Self {
                    opt.map_or_else(Self::none, Self::some)
                }
            }

            impl From<DeviceOptional<$t>> for Option<$t> {
                fn from(opt: DeviceOptional<$t>) -> Self {
                    opt.get()
                }
            }
        )*
    };
}

impl_device_optional!(u32, i32);

// SAFETY: `#[repr(C)]` with two fields of the same `Pod` type has no padding,
// and every bit pattern is a valid `DeviceOptional<T>`.
#[cfg(feature = "gpu")]
unsafe impl<T: bytemuck::Zeroable> bytemuck::Zeroable for DeviceOptional<T> {}

#[cfg(feature = "gpu")]
unsafe impl<T: bytemuck::Pod> bytemuck::Pod for DeviceOptional<T> {}
