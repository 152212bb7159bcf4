use crate::{
    errors::errors::Error,
    semantic::program::{MethodId, Program},
    types::context::{TypeId, TypeKind, TypeRegistry},
    Span,
};

/// Appends the encoding of `ty` to `out`.
///
/// Natives are a single letter, classes `C<len><name>`, arrays `A<element>`
/// and pointers `P<pointee>`.
pub fn mangle_type(registry: &TypeRegistry, ty: TypeId, out: &mut String) -> Result<(), Error> {
    match registry.get_type(ty)? {
        TypeKind::Native(kind) => out.push(kind.mangle_tag()),
        TypeKind::Class(class) => {
            let name = registry.class_name(*class).ok_or_else(|| {
                Error::internal(format!("class {} has no name", class.index()), Span::null())
            })?;
            out.push('C');
            push_name(out, name);
        },
        TypeKind::Array(element) => {
            out.push('A');
            mangle_type(registry, *element, out)?;
        },
        TypeKind::Pointer(pointee) => {
            out.push('P');
            mangle_type(registry, *pointee, out)?;
        },
    }

    Ok(())
}

fn push_name(out: &mut String, name: &str) {
    out.push_str(&name.len().to_string());
    out.push_str(name);
}

/// The linkage name of `method`.
///
/// Free functions declared without a body keep their source name so they
/// link against the outside world; everything else is encoded.
pub fn mangle_method(registry: &TypeRegistry, program: &Program, method: MethodId) -> Result<String, Error> {
    let resolved = program.method(method)?;

    if resolved.owner.is_none() && resolved.is_external() {
        return Ok(resolved.name.clone());
    }

    let mut out = String::from("_M");
    if let Some(class) = resolved.owner {
        push_name(&mut out, &program.class(class)?.name);
    }
    push_name(&mut out, &resolved.name);

    let parameters = program.parameter_types(method)?;
    if parameters.is_empty() {
        out.push('v');
    }
    for parameter in parameters {
        mangle_type(registry, parameter, &mut out)?;
    }

    Ok(out)
}
