//! Subject and body templates for verification emails, keyed by purpose.

use vitalia_types::auth::CodePurpose;

/// Subject line for a verification email.
pub fn subject(purpose: CodePurpose) -> &'static str {
    match purpose {
        CodePurpose::Signup => "Vitalia - Verify Your Account",
        CodePurpose::Signin => "Vitalia - Sign In Verification",
        CodePurpose::PasswordReset => "Vitalia - Password Reset",
    }
}

/// Plain-text body for a verification email.
pub fn body(purpose: CodePurpose, code: &str, display_name: &str) -> String {
    let name = if display_name.is_empty() {
        "there"
    } else {
        display_name
    };

    match purpose {
        CodePurpose::Signup => format!(
            "Hi {name},\n\n\
             Thanks for signing up for Vitalia. Verify your email address \
             with this code: {code}\n\n\
             The code expires in 15 minutes. If you didn't create an \
             account, ignore this email.\n"
        ),
        CodePurpose::Signin => format!(
            "Hi {name},\n\n\
             Someone is signing in to your Vitalia account. If this was \
             you, use this code: {code}\n\n\
             The code expires in 15 minutes. If this wasn't you, secure \
             your account immediately.\n"
        ),
        CodePurpose::PasswordReset => format!(
            "Hi {name},\n\n\
             You requested a password reset. Use this code to proceed: \
             {code}\n\n\
             The code expires in 15 minutes. If you didn't request a \
             reset, ignore this email.\n"
        ),
    }
}
