#[cfg(not(any(test, feature = "debug-checks")))]
pub(crate) const TNU_ASSERT_LEVEL_DEFINITION: u8 = TNU_ASSERT_SIMPLE;
#[cfg(any(test, feature = "debug-checks"))]
pub(crate) const TNU_ASSERT_LEVEL_DEFINITION: u8 = TNU_ASSERT_EXTREME;

pub(crate) const TNU_ASSERT_SIMPLE: u8 = 1;
pub(crate) const TNU_ASSERT_MODERATE: u8 = 2;
pub(crate) const TNU_ASSERT_ADVANCED: u8 = 3;
pub(crate) const TNU_ASSERT_EXTREME: u8 = 4;

macro_rules! tnu_assert_simple {
    ($($arg:tt)*) => {
        if $crate::tnu_asserts::TNU_ASSERT_LEVEL_DEFINITION >= $crate::tnu_asserts::TNU_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! tnu_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::tnu_asserts::TNU_ASSERT_LEVEL_DEFINITION >= $crate::tnu_asserts::TNU_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! tnu_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::tnu_asserts::TNU_ASSERT_LEVEL_DEFINITION >= $crate::tnu_asserts::TNU_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! tnu_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::tnu_asserts::TNU_ASSERT_LEVEL_DEFINITION >= $crate::tnu_asserts::TNU_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

macro_rules! tnu_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::tnu_asserts::TNU_ASSERT_LEVEL_DEFINITION >= $crate::tnu_asserts::TNU_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use tnu_assert_advanced;
pub(crate) use tnu_assert_eq_simple;
pub(crate) use tnu_assert_extreme;
pub(crate) use tnu_assert_moderate;
pub(crate) use tnu_assert_simple;
