use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, GenericArgument, Ident, LitStr, PathArguments, Type};

struct Attribute {
    ident: Ident,
    name: String,
    ty: Type,
}

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();

    // Extract #[model(table = "...")] from struct-level attributes
    let table = extract_table(input)?;

    let ModelFields {
        attributes,
        lifecycle,
        id,
    } = extract_fields(input)?;

    let idents: Vec<_> = attributes.iter().map(|a| &a.ident).collect();
    let names: Vec<_> = attributes.iter().map(|a| a.name.as_str()).collect();
    let types: Vec<_> = attributes.iter().map(|a| &a.ty).collect();
    let setters: Vec<_> = attributes
        .iter()
        .map(|a| format_ident!("set_{}", a.name))
        .collect();

    let expanded = quote! {
        impl ::mini_record::Model for #name {
            const NAME: &'static str = #name_str;
            const TABLE: &'static str = #table;
            const ATTRIBUTES: &'static [&'static str] = &[#(#names),*];
            const ID_ATTRIBUTE: &'static str = #id;

            fn blank() -> Self {
                Self {
                    #(#idents: ::core::option::Option::None,)*
                    #lifecycle: ::mini_record::Lifecycle::new(),
                }
            }

            fn read_attribute(&self, name: &str) -> ::core::option::Option<::mini_record::Value> {
                match name {
                    #(
                        #names => self
                            .#idents
                            .clone()
                            .map(::mini_record::AttributeValue::into_value),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            fn write_attribute(
                &mut self,
                name: &str,
                value: ::mini_record::Value,
            ) -> ::mini_record::Result<()> {
                match name {
                    #(
                        #names => {
                            let value = <#types as ::mini_record::AttributeValue>::from_value(value)
                                .map_err(|found| ::mini_record::OrmError::TypeMismatch {
                                    model: #name_str,
                                    attribute: name.to_string(),
                                    expected: <#types as ::mini_record::AttributeValue>::KIND,
                                    found,
                                })?;
                            self.#idents = ::core::option::Option::Some(value);
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(::mini_record::OrmError::UnknownAttribute {
                        model: #name_str,
                        attribute: name.to_string(),
                    }),
                }
            }

            fn lifecycle(&self) -> &::mini_record::Lifecycle {
                &self.#lifecycle
            }

            fn lifecycle_mut(&mut self) -> &mut ::mini_record::Lifecycle {
                &mut self.#lifecycle
            }
        }

        #[allow(dead_code)]
        impl #name {
            #(
                pub fn #idents(&self) -> ::core::option::Option<#types> {
                    self.#idents.clone()
                }

                pub fn #setters(&mut self, value: impl ::core::convert::Into<#types>) {
                    self.#idents = ::core::option::Option::Some(value.into());
                }
            )*
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::mini_record::inspect(self, f)
            }
        }
    };

    Ok(expanded)
}

fn extract_table(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        let mut table = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `table = \"...\"`"))
            }
        })?;

        if let Some(t) = table {
            return Ok(t);
        }
    }

    // Default: SCREAMING_SNAKE_CASE struct name + "S"
    let name = input.ident.to_string();
    Ok(format!("{}S", to_snake_case(&name).to_uppercase()))
}

struct ModelFields {
    attributes: Vec<Attribute>,
    lifecycle: Ident,
    id: String,
}

/// Split the named fields into attributes, the lifecycle field and the
/// identifier attribute.
fn extract_fields(input: &DeriveInput) -> syn::Result<ModelFields> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Model derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model derive: only structs are supported",
            ))
        }
    };

    let mut marked = None;
    let mut marked_id = None;
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("lifecycle") {
                    marked = field.ident.clone();
                    Ok(())
                } else if meta.path.is_ident("id") {
                    marked_id = field.ident.clone();
                    Ok(())
                } else {
                    Err(meta.error("expected `lifecycle` or `id`"))
                }
            })?;
        }
    }

    // Default: a field named "lifecycle"
    let lifecycle = marked
        .or_else(|| {
            fields
                .iter()
                .filter_map(|f| f.ident.clone())
                .find(|ident| ident == "lifecycle")
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Model derive: no field marked with #[model(lifecycle)] and no field named `lifecycle`",
            )
        })?;

    let mut attributes = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if ident == lifecycle {
            continue;
        }
        let ty = option_inner(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                "Model derive: attribute fields must be `Option<T>`",
            )
        })?;
        attributes.push(Attribute {
            name: ident.to_string(),
            ident,
            ty: ty.clone(),
        });
    }

    // Default: the attribute named "id"
    let id_name = marked_id.map_or_else(|| "id".to_string(), |ident| ident.to_string());
    let id_attr = attributes
        .iter()
        .find(|a| a.name == id_name)
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Model derive: no attribute marked with #[model(id)] and no field `id: Option<i64>`",
            )
        })?;
    if !is_i64(&id_attr.ty) {
        return Err(syn::Error::new_spanned(
            &id_attr.ty,
            "Model derive: the identifier attribute must be `Option<i64>`",
        ));
    }

    Ok(ModelFields {
        attributes,
        lifecycle,
        id: id_name,
    })
}

fn is_i64(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("i64"))
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
