//! JNI bridge: the exported native method and the `jbyteArray` host behind it.

use std::marker::PhantomData;
use std::ptr::NonNull;

use jni::JNIEnv;
use jni::objects::{JByteArray, JClass};
use jni::sys::{self, JNI_FALSE, jarray, jboolean, jlong};

use crate::hold::hold;
use crate::host::{CriticalHost, RawCritical, ReleaseMode};

/// A Java `byte[]` pinned through `GetPrimitiveArrayCritical`.
///
/// Calls go straight through the raw JNI function table: nothing between
/// acquire and release may call back into the JVM.
#[derive(Debug)]
pub struct JniByteArray<'a> {
    env: *mut sys::JNIEnv,
    array: jarray,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> JniByteArray<'a> {
    pub fn new(env: &'a JNIEnv<'_>, array: &'a JByteArray<'_>) -> Self {
        Self {
            env: env.get_raw(),
            array: array.as_raw(),
            _borrow: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `env` must be a valid `JNIEnv` for the current thread and `array` a
    /// live local or global reference to a Java `byte[]` (or null), both for
    /// as long as the returned value is used.
    pub unsafe fn from_raw(env: *mut sys::JNIEnv, array: jarray) -> Self {
        Self {
            env,
            array,
            _borrow: PhantomData,
        }
    }

    fn functions(&self) -> Option<&sys::JNINativeInterface_> {
        if self.env.is_null() {
            return None;
        }
        // SAFETY: a non-null JNIEnv points at a pointer to the JVM's function
        // table, valid for the lifetime of the thread attachment.
        unsafe { (*self.env).as_ref() }
    }
}

// SAFETY: the JVM keeps a critical array readable for its reported length
// until `ReleasePrimitiveArrayCritical`.
unsafe impl CriticalHost for JniByteArray<'_> {
    fn acquire_critical(&self) -> Option<RawCritical> {
        if self.array.is_null() {
            return None;
        }
        let functions = self.functions()?;
        let get_length = functions.GetArrayLength?;
        let get_critical = functions.GetPrimitiveArrayCritical?;

        // SAFETY: env and array are valid per the constructor contracts.
        let len = unsafe { get_length(self.env, self.array) };
        let len = usize::try_from(len).ok()?;

        let mut is_copy: jboolean = JNI_FALSE;
        // SAFETY: as above; is_copy is a valid out-pointer.
        let ptr = unsafe { get_critical(self.env, self.array, &mut is_copy) };
        let ptr = NonNull::new(ptr.cast::<u8>())?;

        Some(RawCritical {
            ptr,
            len,
            is_copy: is_copy != JNI_FALSE,
            tag: 0,
        })
    }

    unsafe fn release_critical(&self, raw: RawCritical, mode: ReleaseMode) {
        let Some(release) = self.functions().and_then(|f| f.ReleasePrimitiveArrayCritical) else {
            return;
        };
        // SAFETY: raw.ptr came from GetPrimitiveArrayCritical on this array.
        unsafe { release(self.env, self.array, raw.ptr.as_ptr().cast(), mode.as_jni_mode()) };
    }
}

/// `private static native void holdArrayCritical(byte[] array, long millis)`
/// on `com.example.training.g1.G1RegionPinningDemo`.
///
/// Keeps `array` critically pinned for `millis` milliseconds. A refused pin
/// returns at once without sleeping.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_training_g1_G1RegionPinningDemo_holdArrayCritical<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    array: JByteArray<'local>,
    millis: jlong,
) {
    let host = JniByteArray::new(&env, &array);
    hold(&host, millis);
}
