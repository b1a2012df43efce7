/// Kotlin style scope function, handy at the end of long method chains.
pub trait LetAlso: Sized {
    fn let_owned<R, F: FnOnce(Self) -> R>(self, f: F) -> R {
        f(self)
    }
}

impl<T> LetAlso for T {}
