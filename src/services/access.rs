// src/services/access.rs
//
// Checagens de acesso feitas antes de qualquer escrita.
// A proteção definitiva continua nas políticas RLS do banco; aqui só evitamos
// disparar uma operação que seria recusada e informamos a interface (`canEdit`).

use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Actor};

/// Dono do registro ou administrador.
pub fn can_edit_record(actor: &Actor, owner_id: Uuid) -> bool {
    owner_id == actor.id || actor.is_admin
}

/// Cidades e regiões: somente administradores.
pub fn can_edit_config(actor: &Actor) -> bool {
    actor.is_admin
}

pub fn ensure_can_edit_record(
    actor: &Actor,
    owner_id: Uuid,
    action: &'static str,
) -> Result<(), AppError> {
    if can_edit_record(actor, owner_id) {
        return Ok(());
    }
    tracing::warn!(actor = %actor.id, owner = %owner_id, "Tentativa de {} recusada", action);
    Err(AppError::Forbidden(action))
}

pub fn ensure_can_edit_config(actor: &Actor) -> Result<(), AppError> {
    if can_edit_config(actor) {
        return Ok(());
    }
    tracing::warn!(actor = %actor.id, "Alteração de configuração recusada");
    Err(AppError::Forbidden("editar as configurações"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(is_admin: bool) -> Actor {
        Actor { id: Uuid::new_v4(), is_admin }
    }

    #[test]
    fn owner_can_edit_own_record() {
        let seller = actor(false);
        assert!(can_edit_record(&seller, seller.id));
    }

    #[test]
    fn seller_cannot_edit_someone_elses_record() {
        let seller = actor(false);
        assert!(!can_edit_record(&seller, Uuid::new_v4()));
        assert!(matches!(
            ensure_can_edit_record(&seller, Uuid::new_v4(), "excluir este registro"),
            Err(AppError::Forbidden("excluir este registro"))
        ));
    }

    #[test]
    fn admin_can_edit_any_record() {
        let admin = actor(true);
        assert!(can_edit_record(&admin, Uuid::new_v4()));
        assert!(can_edit_record(&admin, admin.id));
        assert!(ensure_can_edit_record(&admin, Uuid::new_v4(), "editar este registro").is_ok());
    }

    #[test]
    fn only_admins_edit_config() {
        assert!(can_edit_config(&actor(true)));
        assert!(!can_edit_config(&actor(false)));
        assert!(ensure_can_edit_config(&actor(false)).is_err());
    }
}
