use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, LitStr};

/// Parses an expression literal at compile time and expands to the
/// `lexaard::Expression` it denotes. A malformed literal is a compile error.
#[proc_macro]
pub fn expression(input: TokenStream) -> TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    match lexaard_regular_expressions::parse_expression(literal.value()) {
        Ok(expression) => expression.emit(&quote!(::lexaard)).into(),
        Err(e) => syn::Error::new_spanned(&literal, format!("invalid expression: {e}"))
            .to_compile_error()
            .into(),
    }
}
