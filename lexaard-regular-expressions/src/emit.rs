use crate::Expression;
use proc_macro2::TokenStream;
use quote::quote;

impl Expression {
    /// Convert this expression into rust code that builds it again.
    /// `krate` is the path through which `Expression` is reachable where the
    /// code is emitted, for example `::lexaard`.
    pub fn emit(&self, krate: &TokenStream) -> TokenStream {
        match self {
            Expression::Char(c) => quote!(#krate::Expression::Char(#c)),
            Expression::Empty => quote!(#krate::Expression::Empty),
            Expression::Null => quote!(#krate::Expression::Null),
            Expression::Error => quote!(#krate::Expression::Error),
            Expression::Union(children) => {
                let children = children.iter().map(|child| child.emit(krate));
                quote!(#krate::Expression::Union(::std::vec![#(#children),*]))
            }
            Expression::Concat(children) => {
                let children = children.iter().map(|child| child.emit(krate));
                quote!(#krate::Expression::Concat(::std::vec![#(#children),*]))
            }
            Expression::Star(inner) => {
                let inner = inner.emit(krate);
                quote!(#krate::Expression::Star(::std::boxed::Box::new(#inner)))
            }
        }
    }
}
